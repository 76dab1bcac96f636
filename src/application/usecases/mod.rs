pub mod create_contact;
pub mod dispatch_message;
pub mod list_messages;
pub mod list_scheduled;
pub mod record_inbound;
pub mod run_sweep;

pub mod contacts;
pub mod health;
pub mod messages;
pub mod root;
pub mod scheduled;
pub mod webhooks;

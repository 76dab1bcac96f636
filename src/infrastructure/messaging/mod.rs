pub mod factory;
pub mod resend;
pub mod twilio;

pub use factory::ProviderSenderFactory;
pub use resend::{EmailConfig, ResendEmailSender};
pub use twilio::{TwilioConfig, TwilioSmsSender, TwilioWhatsAppSender};

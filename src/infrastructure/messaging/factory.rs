use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::{
    resend::{EmailConfig, ResendEmailSender},
    twilio::{TwilioConfig, TwilioSmsSender, TwilioWhatsAppSender},
};
use crate::{
    application::services::sender::{ChannelSender, SenderFactory},
    domain::{errors::DispatchError, models::Channel},
};

/// Maps channels to provider-backed senders. The HTTP client is shared,
/// senders are built per call.
#[derive(Clone)]
pub struct ProviderSenderFactory {
    http: Client,
    twilio: Arc<TwilioConfig>,
    email: Arc<EmailConfig>,
}

impl ProviderSenderFactory {
    pub fn new(
        twilio: TwilioConfig,
        email: EmailConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("inbox/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            twilio: Arc::new(twilio),
            email: Arc::new(email),
        })
    }
}

impl SenderFactory for ProviderSenderFactory {
    fn create_sender(&self, channel: &str) -> Result<Box<dyn ChannelSender>, DispatchError> {
        let sender: Box<dyn ChannelSender> = match channel.parse::<Channel>()? {
            Channel::Sms => Box::new(TwilioSmsSender::new(self.http.clone(), self.twilio.clone())),
            Channel::Whatsapp => Box::new(TwilioWhatsAppSender::new(
                self.http.clone(),
                self.twilio.clone(),
            )),
            Channel::Email => Box::new(ResendEmailSender::new(self.http.clone(), self.email.clone())),
        };
        Ok(sender)
    }
}

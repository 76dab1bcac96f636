use async_trait::async_trait;

use crate::domain::{
    errors::{DispatchError, TransportError},
    models::Channel,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub to: String,
    pub content: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub external_id: String,
    /// Provider-defined status, passed through without interpretation.
    pub status: String,
}

/// Delivers a message over one transport. Implementations never retry.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    fn channel(&self) -> Channel;
    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, TransportError>;
}

/// Builds a fresh sender per call. Underlying HTTP clients may be shared.
pub trait SenderFactory: Send + Sync {
    /// Fails with [`DispatchError::UnsupportedChannel`] for anything outside
    /// `sms`, `whatsapp` and `email`.
    fn create_sender(&self, channel: &str) -> Result<Box<dyn ChannelSender>, DispatchError>;
}

use thiserror::Error;
use uuid::Uuid;

use super::models::Channel;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),
    #[error("Contact is missing the {field} required for {channel} delivery")]
    MissingAddress {
        channel: Channel,
        field: &'static str,
    },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Unsupported channel: {0}")]
    UnsupportedChannel(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by a provider call. Carries no retry semantics.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} rejected the message ({status}): {message}")]
    Rejected {
        provider: &'static str,
        status: u16,
        message: String,
    },
}

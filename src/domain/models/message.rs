use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::channel::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inbound" => Some(Direction::Inbound),
            "outbound" => Some(Direction::Outbound),
            _ => None,
        }
    }
}

/// Lifecycle of a message.
///
/// Outbound: `Scheduled -> Sending -> Delivered | Failed`, or straight to
/// `Delivered | Failed` for an immediate send. Inbound messages are created
/// `Received` and never move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    Scheduled,
    /// Claimed by exactly one sweep run; a delivery attempt is in progress.
    Sending,
    /// Accepted by the provider. Holds the provider's status string verbatim.
    Delivered(String),
    Failed,
    Received,
}

impl MessageStatus {
    /// Status as shown to callers: the provider string for delivered
    /// messages, the fixed name otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            MessageStatus::Delivered(provider_status) => provider_status,
            other => other.kind(),
        }
    }

    /// Stored discriminant, independent of the provider string.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageStatus::Scheduled => "scheduled",
            MessageStatus::Sending => "sending",
            MessageStatus::Delivered(_) => "delivered",
            MessageStatus::Failed => "failed",
            MessageStatus::Received => "received",
        }
    }

    pub fn provider_status(&self) -> Option<&str> {
        match self {
            MessageStatus::Delivered(provider_status) => Some(provider_status),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MessageStatus::Scheduled | MessageStatus::Sending)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Option<Uuid>,
    pub channel: Channel,
    pub direction: Direction,
    pub content: String,
    pub media_url: Option<String>,
    pub status: MessageStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub contact_id: Uuid,
    pub user_id: Option<Uuid>,
    pub channel: Channel,
    pub direction: Direction,
    pub content: String,
    pub media_url: Option<String>,
    pub status: MessageStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
}

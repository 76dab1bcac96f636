use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::{Channel, Contact, Message, MessageStatus, NewContact, NewMessage};

pub const MAX_LIST_LIMIT: u32 = 200;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Contact>>;
    async fn insert(&self, contact: NewContact) -> anyhow::Result<Contact>;

    /// Oldest contact with this phone, or a new phone-only contact. Atomic:
    /// concurrent calls for the same phone create at most one contact. The
    /// flag is `true` when the contact was created.
    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<(Contact, bool)>;
}

#[derive(Debug, Clone)]
pub struct MessageFilter {
    pub contact_id: Option<Uuid>,
    pub channel: Option<Channel>,
    /// Matched against [`MessageStatus::as_str`].
    pub status: Option<String>,
    pub limit: u32,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            contact_id: None,
            channel: None,
            status: None,
            limit: MAX_LIST_LIMIT,
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: NewMessage) -> anyhow::Result<Message>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Message>>;

    /// Newest first.
    async fn list(&self, filter: &MessageFilter) -> anyhow::Result<Vec<Message>>;

    /// Every message still waiting in `Scheduled`, earliest `scheduled_at` first.
    async fn list_scheduled(&self) -> anyhow::Result<Vec<Message>>;

    /// `Scheduled` messages whose `scheduled_at <= now`, earliest first.
    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Message>>;

    /// Atomically moves a message from `Scheduled` to `Sending`.
    ///
    /// Returns `true` only for the single caller that performed the
    /// transition; every other caller, concurrent or later, gets `false`.
    async fn claim(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Moves a claimed (`Sending`) message to its terminal status. Errors if
    /// the message is not currently claimed or `status` is not terminal.
    async fn complete(
        &self,
        id: Uuid,
        status: MessageStatus,
        sent_at: Option<DateTime<Utc>>,
        metadata: Option<Value>,
    ) -> anyhow::Result<()>;
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{Contact, Message, MessageStatus, NewContact, NewMessage},
    repositories::{ContactRepository, MessageFilter, MessageRepository},
};

#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&id).cloned())
    }

    async fn insert(&self, contact: NewContact) -> anyhow::Result<Contact> {
        let contact = new_contact(contact);
        let mut contacts = self.contacts.write().await;
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<(Contact, bool)> {
        // lookup and insert under one write lock
        let mut contacts = self.contacts.write().await;
        let existing = contacts
            .values()
            .filter(|c| c.phone.as_deref() == Some(phone))
            .min_by_key(|c| c.created_at)
            .cloned();
        if let Some(contact) = existing {
            return Ok((contact, false));
        }
        let contact = new_contact(NewContact {
            phone: Some(phone.to_string()),
            ..Default::default()
        });
        contacts.insert(contact.id, contact.clone());
        Ok((contact, true))
    }
}

fn new_contact(contact: NewContact) -> Contact {
    let now = Utc::now();
    Contact {
        id: Uuid::new_v4(),
        name: contact.name,
        phone: contact.phone,
        email: contact.email,
        social_handles: contact.social_handles,
        metadata: contact.metadata,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: NewMessage) -> anyhow::Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            contact_id: message.contact_id,
            user_id: message.user_id,
            channel: message.channel,
            direction: message.direction,
            content: message.content,
            media_url: message.media_url,
            status: message.status,
            scheduled_at: message.scheduled_at,
            sent_at: message.sent_at,
            metadata: message.metadata,
            created_at: Utc::now(),
        };
        let mut messages = self.messages.write().await;
        messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(messages.get(&id).cloned())
    }

    async fn list(&self, filter: &MessageFilter) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| filter.contact_id.is_none_or(|id| m.contact_id == id))
            .filter(|m| filter.channel.is_none_or(|channel| m.channel == channel))
            .filter(|m| {
                filter
                    .status
                    .as_deref()
                    .is_none_or(|status| m.status.as_str() == status)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(filter.limit as usize);
        Ok(found)
    }

    async fn list_scheduled(&self) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| m.status == MessageStatus::Scheduled)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.scheduled_at);
        Ok(found)
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| {
                m.status == MessageStatus::Scheduled && m.scheduled_at.is_some_and(|at| at <= now)
            })
            .cloned()
            .collect();
        found.sort_by_key(|m| m.scheduled_at);
        Ok(found)
    }

    async fn claim(&self, id: Uuid) -> anyhow::Result<bool> {
        // check-and-set under the write lock
        let mut messages = self.messages.write().await;
        match messages.get_mut(&id) {
            Some(message) if message.status == MessageStatus::Scheduled => {
                message.status = MessageStatus::Sending;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete(
        &self,
        id: Uuid,
        status: MessageStatus,
        sent_at: Option<DateTime<Utc>>,
        metadata: Option<Value>,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            status.is_terminal(),
            "message {id} cannot be completed as {}",
            status.kind()
        );
        let mut messages = self.messages.write().await;
        let message = messages
            .get_mut(&id)
            .filter(|m| m.status == MessageStatus::Sending)
            .ok_or_else(|| anyhow::anyhow!("message {id} is not claimed for delivery"))?;
        message.status = status;
        if sent_at.is_some() {
            message.sent_at = sent_at;
        }
        if metadata.is_some() {
            message.metadata = metadata;
        }
        Ok(())
    }
}

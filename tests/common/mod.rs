#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inbox::{
    application::services::sender::{ChannelSender, SendReceipt, SendRequest, SenderFactory},
    domain::{
        errors::{DispatchError, TransportError},
        models::{Channel, Contact, Direction, Message, MessageStatus, NewContact, NewMessage},
        repositories::{ContactRepository, MessageRepository},
    },
    infrastructure::repositories::{InMemoryContactRepository, InMemoryMessageRepository},
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub channel: Channel,
    pub request: SendRequest,
}

/// Sender factory whose senders record every call instead of hitting a
/// provider. Addresses in `failing` are rejected.
#[derive(Clone)]
pub struct RecordingFactory {
    calls: Arc<Mutex<Vec<RecordedSend>>>,
    failing: Arc<HashSet<String>>,
    status: String,
}

impl RecordingFactory {
    pub fn new(status: &str) -> Self {
        Self {
            calls: Arc::default(),
            failing: Arc::default(),
            status: status.to_string(),
        }
    }

    pub fn failing_for(mut self, addresses: &[&str]) -> Self {
        self.failing = Arc::new(addresses.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<RecordedSend> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SenderFactory for RecordingFactory {
    fn create_sender(&self, channel: &str) -> Result<Box<dyn ChannelSender>, DispatchError> {
        Ok(Box::new(RecordingSender {
            channel: channel.parse()?,
            factory: self.clone(),
        }))
    }
}

struct RecordingSender {
    channel: Channel,
    factory: RecordingFactory,
}

#[async_trait]
impl ChannelSender for RecordingSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, TransportError> {
        let sequence = {
            let mut calls = self.factory.calls.lock().unwrap();
            calls.push(RecordedSend {
                channel: self.channel,
                request: request.clone(),
            });
            calls.len()
        };
        // let overlapping sweeps interleave at the transport call
        tokio::task::yield_now().await;

        if request.to.trim().is_empty() || self.factory.failing.contains(&request.to) {
            return Err(TransportError::Rejected {
                provider: "mock",
                status: 400,
                message: format!("cannot deliver to '{}'", request.to),
            });
        }
        Ok(SendReceipt {
            external_id: format!("mock-{sequence}"),
            status: self.factory.status.clone(),
        })
    }
}

pub struct Harness {
    pub contacts: Arc<InMemoryContactRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub senders: RecordingFactory,
}

impl Harness {
    pub fn new(senders: RecordingFactory) -> Self {
        Self {
            contacts: Arc::new(InMemoryContactRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
            senders,
        }
    }

    pub fn contact_repo(&self) -> Arc<dyn ContactRepository> {
        self.contacts.clone()
    }

    pub fn message_repo(&self) -> Arc<dyn MessageRepository> {
        self.messages.clone()
    }

    pub fn sender_factory(&self) -> Arc<dyn SenderFactory> {
        Arc::new(self.senders.clone())
    }

    pub async fn contact(&self, phone: Option<&str>, email: Option<&str>) -> Contact {
        self.contacts
            .insert(NewContact {
                name: Some("Test Contact".to_string()),
                phone: phone.map(str::to_string),
                email: email.map(str::to_string),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub async fn scheduled_message(
        &self,
        contact: &Contact,
        channel: Channel,
        scheduled_at: DateTime<Utc>,
    ) -> Message {
        self.messages
            .insert(NewMessage {
                contact_id: contact.id,
                user_id: None,
                channel,
                direction: Direction::Outbound,
                content: "See you tomorrow".to_string(),
                media_url: None,
                status: MessageStatus::Scheduled,
                scheduled_at: Some(scheduled_at),
                sent_at: None,
                metadata: None,
            })
            .await
            .unwrap()
    }

    pub async fn message(&self, id: Uuid) -> Message {
        self.messages.get(id).await.unwrap().expect("message exists")
    }

    pub async fn all_messages(&self) -> Vec<Message> {
        self.messages.list(&Default::default()).await.unwrap()
    }
}

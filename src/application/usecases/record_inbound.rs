use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::domain::{
    errors::DispatchError,
    models::{Channel, Direction, Message, MessageStatus, NewMessage},
    repositories::{ContactRepository, MessageRepository},
};

const WHATSAPP_MARKER: &str = "whatsapp:";

/// Stores a message delivered to us by the telephony webhook. Inbound
/// messages are terminal on creation.
pub struct RecordInboundUseCase {
    contacts: Arc<dyn ContactRepository>,
    messages: Arc<dyn MessageRepository>,
}

#[derive(Debug, Clone)]
pub struct InboundMessageRequest {
    pub from: String,
    pub body: Option<String>,
    pub message_sid: String,
    pub num_media: u32,
    pub media_url: Option<String>,
}

impl RecordInboundUseCase {
    pub fn new(contacts: Arc<dyn ContactRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { contacts, messages }
    }

    pub async fn execute(&self, request: InboundMessageRequest) -> Result<Message, DispatchError> {
        let channel = if request.from.contains("whatsapp") {
            Channel::Whatsapp
        } else {
            Channel::Sms
        };
        let phone = request.from.replace(WHATSAPP_MARKER, "").trim().to_string();
        if phone.is_empty() {
            return Err(DispatchError::Validation("sender address is required".to_string()));
        }

        let (contact, created) = self.contacts.find_or_create_by_phone(&phone).await?;
        if created {
            info!(contact_id = %contact.id, "contact created from inbound message");
        }

        let media_url = if request.num_media > 0 {
            request.media_url
        } else {
            None
        };

        let message = self
            .messages
            .insert(NewMessage {
                contact_id: contact.id,
                user_id: None,
                channel,
                direction: Direction::Inbound,
                content: request.body.unwrap_or_default(),
                media_url,
                status: MessageStatus::Received,
                scheduled_at: None,
                sent_at: Some(Utc::now()),
                metadata: Some(json!({ "sid": request.message_sid })),
            })
            .await?;

        info!(
            message_id = %message.id,
            contact_id = %contact.id,
            channel = %channel,
            "inbound message recorded"
        );
        Ok(message)
    }
}

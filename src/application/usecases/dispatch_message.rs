use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::services::sender::{SendRequest, SenderFactory},
    domain::{
        errors::DispatchError,
        models::{Direction, Message, MessageStatus, NewMessage},
        repositories::{ContactRepository, MessageRepository},
    },
};

pub struct DispatchMessageUseCase {
    contacts: Arc<dyn ContactRepository>,
    messages: Arc<dyn MessageRepository>,
    senders: Arc<dyn SenderFactory>,
}

#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub contact_id: Uuid,
    pub channel: String,
    pub content: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
    pub media_url: Option<String>,
}

impl DispatchMessageUseCase {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        messages: Arc<dyn MessageRepository>,
        senders: Arc<dyn SenderFactory>,
    ) -> Self {
        Self {
            contacts,
            messages,
            senders,
        }
    }

    /// Sends now, or records the message for the sweep when `scheduled_at`
    /// is set.
    ///
    /// Validation failures leave no record. A transport failure on an
    /// immediate send is recorded as a `Failed` message so the content is
    /// kept, and the error is still returned to the caller.
    pub async fn execute(&self, request: DispatchRequest) -> Result<Message, DispatchError> {
        if request.content.trim().is_empty() {
            return Err(DispatchError::Validation("content is required".to_string()));
        }

        let contact = self
            .contacts
            .get(request.contact_id)
            .await?
            .ok_or(DispatchError::ContactNotFound(request.contact_id))?;

        let sender = self.senders.create_sender(&request.channel)?;
        let channel = sender.channel();

        if let Some(scheduled_at) = request.scheduled_at {
            let message = self
                .messages
                .insert(NewMessage {
                    contact_id: contact.id,
                    user_id: request.user_id,
                    channel,
                    direction: Direction::Outbound,
                    content: request.content,
                    media_url: request.media_url,
                    status: MessageStatus::Scheduled,
                    scheduled_at: Some(scheduled_at),
                    sent_at: None,
                    metadata: None,
                })
                .await?;
            info!(
                message_id = %message.id,
                contact_id = %contact.id,
                channel = %channel,
                %scheduled_at,
                "message scheduled"
            );
            return Ok(message);
        }

        let to = contact
            .deliverable_address(channel)
            .ok_or(DispatchError::MissingAddress {
                channel,
                field: channel.address_field(),
            })?
            .to_string();

        let send_request = SendRequest {
            to,
            content: request.content.clone(),
            media_url: request.media_url.clone(),
        };

        let outbound = |status: MessageStatus, sent_at, metadata| NewMessage {
            contact_id: contact.id,
            user_id: request.user_id,
            channel,
            direction: Direction::Outbound,
            content: request.content.clone(),
            media_url: request.media_url.clone(),
            status,
            scheduled_at: None,
            sent_at,
            metadata: Some(metadata),
        };

        match sender.send(&send_request).await {
            Ok(receipt) => {
                let external_id = receipt.external_id;
                let message = self
                    .messages
                    .insert(outbound(
                        MessageStatus::Delivered(receipt.status),
                        Some(Utc::now()),
                        json!({ "externalId": external_id }),
                    ))
                    .await
                    .map_err(|err| {
                        // the provider already accepted this message
                        error!(
                            contact_id = %contact.id,
                            channel = %channel,
                            %external_id,
                            error = ?err,
                            "sent message could not be recorded"
                        );
                        err.context(format!(
                            "message {external_id} was sent but could not be recorded"
                        ))
                    })?;
                info!(
                    message_id = %message.id,
                    channel = %channel,
                    status = message.status.as_str(),
                    "message sent"
                );
                Ok(message)
            }
            Err(err) => {
                warn!(contact_id = %contact.id, channel = %channel, error = %err, "immediate send failed");
                let failed = outbound(
                    MessageStatus::Failed,
                    None,
                    json!({ "error": err.to_string() }),
                );
                if let Err(store_err) = self.messages.insert(failed).await {
                    error!(
                        contact_id = %contact.id,
                        error = ?store_err,
                        "failed to record unsent message"
                    );
                }
                Err(err.into())
            }
        }
    }
}

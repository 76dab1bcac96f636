use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::{
    application::services::sender::{SendReceipt, SendRequest, SenderFactory},
    domain::{
        errors::DispatchError,
        models::{Message, MessageStatus},
        repositories::{ContactRepository, MessageRepository},
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub claimed: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Due messages another run claimed first, or whose claim errored.
    pub skipped: usize,
}

/// Delivers every scheduled message whose time has come.
///
/// Each message is claimed before its transport call, so overlapping runs
/// never attempt the same message twice. One message failing never stops
/// the rest of the batch.
pub struct RunSweepUseCase {
    contacts: Arc<dyn ContactRepository>,
    messages: Arc<dyn MessageRepository>,
    senders: Arc<dyn SenderFactory>,
}

impl RunSweepUseCase {
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

    /// Only fails when the due-message query itself fails.
    pub async fn execute(&self) -> anyhow::Result<SweepReport> {
        let due = self
            .messages
            .list_due(Utc::now())
            .await
            .context("failed to query due scheduled messages")?;

        let mut report = SweepReport {
            due: due.len(),
            ..Default::default()
        };

        for message in due {
            match self.messages.claim(message.id).await {
                Ok(true) => report.claimed += 1,
                Ok(false) => {
                    debug!(message_id = %message.id, "scheduled message already claimed");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    error!(message_id = %message.id, error = ?err, "failed to claim scheduled message");
                    report.skipped += 1;
                    continue;
                }
            }

            let (status, sent_at, metadata) = match self.deliver(&message).await {
                Ok(receipt) => {
                    report.delivered += 1;
                    (
                        MessageStatus::Delivered(receipt.status),
                        Some(Utc::now()),
                        json!({ "externalId": receipt.external_id }),
                    )
                }
                Err(err) => {
                    warn!(
                        message_id = %message.id,
                        channel = %message.channel,
                        error = %err,
                        "scheduled delivery failed"
                    );
                    report.failed += 1;
                    (MessageStatus::Failed, None, json!({ "error": err.to_string() }))
                }
            };

            if let Err(err) = self
                .messages
                .complete(message.id, status, sent_at, Some(metadata))
                .await
            {
                error!(message_id = %message.id, error = ?err, "failed to record delivery outcome");
            }
        }

        if report.due > 0 {
            info!(
                due = report.due,
                claimed = report.claimed,
                delivered = report.delivered,
                failed = report.failed,
                skipped = report.skipped,
                "scheduled sweep finished"
            );
        }

        Ok(report)
    }

    async fn deliver(&self, message: &Message) -> Result<SendReceipt, DispatchError> {
        let sender = self.senders.create_sender(message.channel.as_str())?;
        let contact = self
            .contacts
            .get(message.contact_id)
            .await?
            .ok_or(DispatchError::ContactNotFound(message.contact_id))?;

        // A blank address goes to the provider as-is and comes back as a
        // transport error.
        let to = contact
            .address(sender.channel())
            .unwrap_or_default()
            .to_string();

        let receipt = sender
            .send(&SendRequest {
                to,
                content: message.content.clone(),
                media_url: message.media_url.clone(),
            })
            .await?;
        Ok(receipt)
    }
}

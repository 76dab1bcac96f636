mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::{Harness, RecordingFactory};
use inbox::{
    application::usecases::{
        create_contact::CreateContactUseCase,
        dispatch_message::{DispatchMessageUseCase, DispatchRequest},
        list_messages::ListMessagesUseCase,
        record_inbound::{InboundMessageRequest, RecordInboundUseCase},
    },
    domain::{
        errors::DispatchError,
        models::{Channel, Direction, Message, MessageStatus, NewContact, NewMessage},
        repositories::{ContactRepository, MessageFilter, MessageRepository},
    },
};
use serde_json::Value;
use tokio::task::JoinSet;
use uuid::Uuid;

fn dispatcher(harness: &Harness) -> DispatchMessageUseCase {
    DispatchMessageUseCase::new(
        harness.contact_repo(),
        harness.message_repo(),
        harness.sender_factory(),
    )
}

fn request(contact_id: Uuid, channel: &str) -> DispatchRequest {
    DispatchRequest {
        contact_id,
        channel: channel.to_string(),
        content: "Hello there".to_string(),
        scheduled_at: None,
        user_id: None,
        media_url: None,
    }
}

#[tokio::test]
async fn scheduled_send_records_message_without_transport_call() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness.contact(Some("+15551234567"), None).await;
    let at = Utc::now() + Duration::hours(2);
    let user_id = Uuid::new_v4();

    let message = dispatcher(&harness)
        .execute(DispatchRequest {
            scheduled_at: Some(at),
            user_id: Some(user_id),
            ..request(contact.id, "sms")
        })
        .await
        .unwrap();

    assert_eq!(message.status, MessageStatus::Scheduled);
    assert_eq!(message.scheduled_at, Some(at));
    assert_eq!(message.user_id, Some(user_id));
    assert_eq!(message.direction, Direction::Outbound);
    assert!(message.sent_at.is_none());
    assert_eq!(harness.senders.call_count(), 0);
    assert_eq!(harness.all_messages().await.len(), 1);
}

#[tokio::test]
async fn scheduled_send_does_not_require_an_address_up_front() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness.contact(Some("+15551234567"), None).await;

    let message = dispatcher(&harness)
        .execute(DispatchRequest {
            scheduled_at: Some(Utc::now() + Duration::minutes(5)),
            ..request(contact.id, "email")
        })
        .await
        .unwrap();

    assert_eq!(message.status, MessageStatus::Scheduled);
    assert_eq!(message.channel, Channel::Email);
    assert_eq!(harness.senders.call_count(), 0);
}

#[tokio::test]
async fn immediate_send_stores_provider_status_verbatim() {
    let harness = Harness::new(RecordingFactory::new("accepted-by-carrier"));
    let contact = harness.contact(Some("+15551234567"), None).await;
    let before = Utc::now();

    let message = dispatcher(&harness)
        .execute(request(contact.id, "sms"))
        .await
        .unwrap();

    assert_eq!(
        message.status,
        MessageStatus::Delivered("accepted-by-carrier".to_string())
    );
    assert_eq!(message.status.as_str(), "accepted-by-carrier");
    assert!(message.sent_at.is_some_and(|at| at >= before));
    assert_eq!(
        message.metadata.as_ref().and_then(|m| m["externalId"].as_str()),
        Some("mock-1")
    );

    let calls = harness.senders.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].channel, Channel::Sms);
    assert_eq!(calls[0].request.to, "+15551234567");
    assert_eq!(calls[0].request.content, "Hello there");
}

#[tokio::test]
async fn email_channel_resolves_email_address() {
    let harness = Harness::new(RecordingFactory::new("sent"));
    let contact = harness
        .contact(Some("+15551234567"), Some("ada@example.com"))
        .await;

    dispatcher(&harness)
        .execute(request(contact.id, "email"))
        .await
        .unwrap();

    let calls = harness.senders.calls();
    assert_eq!(calls[0].channel, Channel::Email);
    assert_eq!(calls[0].request.to, "ada@example.com");
}

#[tokio::test]
async fn missing_address_fails_and_leaves_no_record() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let phone_only = harness.contact(Some("+15551234567"), None).await;
    let email_only = harness.contact(None, Some("ada@example.com")).await;

    let err = dispatcher(&harness)
        .execute(request(phone_only.id, "email"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::MissingAddress {
            channel: Channel::Email,
            field: "email"
        }
    ));

    let err = dispatcher(&harness)
        .execute(request(email_only.id, "whatsapp"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::MissingAddress {
            field: "phone",
            ..
        }
    ));

    assert_eq!(harness.senders.call_count(), 0);
    assert!(harness.all_messages().await.is_empty());
}

#[tokio::test]
async fn unknown_contact_is_not_found() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let missing = Uuid::new_v4();

    let err = dispatcher(&harness)
        .execute(request(missing, "sms"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::ContactNotFound(id) if id == missing));
    assert!(harness.all_messages().await.is_empty());
}

#[tokio::test]
async fn unsupported_channel_fails_before_transport() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness.contact(Some("+15551234567"), None).await;

    let err = dispatcher(&harness)
        .execute(request(contact.id, "fax"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::UnsupportedChannel(ref c) if c == "fax"));
    assert_eq!(harness.senders.call_count(), 0);
    assert!(harness.all_messages().await.is_empty());
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness.contact(Some("+15551234567"), None).await;

    let err = dispatcher(&harness)
        .execute(DispatchRequest {
            content: "   ".to_string(),
            ..request(contact.id, "sms")
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Validation(_)));
    assert!(harness.all_messages().await.is_empty());
}

#[tokio::test]
async fn transport_failure_is_returned_and_recorded_as_failed() {
    let harness = Harness::new(RecordingFactory::new("queued").failing_for(&["+15550000000"]));
    let contact = harness.contact(Some("+15550000000"), None).await;

    let err = dispatcher(&harness)
        .execute(request(contact.id, "sms"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)));

    let stored = harness.all_messages().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, MessageStatus::Failed);
    assert_eq!(stored[0].content, "Hello there");
    assert!(stored[0].sent_at.is_none());
    assert!(
        stored[0]
            .metadata
            .as_ref()
            .and_then(|m| m["error"].as_str())
            .is_some_and(|e| e.contains("+15550000000"))
    );
}

#[tokio::test]
async fn contact_without_phone_or_email_is_not_created() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let usecase = CreateContactUseCase::new(harness.contact_repo());

    let err = usecase
        .execute(NewContact {
            name: Some("Nobody".to_string()),
            phone: Some("".to_string()),
            email: None,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));

    let created = usecase
        .execute(NewContact {
            phone: Some("+15551234567".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let (found, was_created) = harness
        .contacts
        .find_or_create_by_phone("+15551234567")
        .await
        .unwrap();
    assert!(!was_created);
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn inbound_whatsapp_message_creates_contact_and_received_record() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let usecase = RecordInboundUseCase::new(harness.contact_repo(), harness.message_repo());

    let message = usecase
        .execute(InboundMessageRequest {
            from: "whatsapp:+15551234567".to_string(),
            body: Some("hi!".to_string()),
            message_sid: "SM999".to_string(),
            num_media: 1,
            media_url: Some("https://media.example.com/cat.jpg".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(message.channel, Channel::Whatsapp);
    assert_eq!(message.direction, Direction::Inbound);
    assert_eq!(message.status, MessageStatus::Received);
    assert!(message.status.is_terminal());
    assert!(message.sent_at.is_some());
    assert_eq!(
        message.media_url.as_deref(),
        Some("https://media.example.com/cat.jpg")
    );
    assert_eq!(
        message.metadata.as_ref().and_then(|m| m["sid"].as_str()),
        Some("SM999")
    );

    let (contact, created) = harness
        .contacts
        .find_or_create_by_phone("+15551234567")
        .await
        .unwrap();
    assert!(!created, "contact created from sender number");
    assert_eq!(message.contact_id, contact.id);
    assert_eq!(harness.senders.call_count(), 0);
}

#[tokio::test]
async fn inbound_sms_reuses_existing_contact_and_ignores_media_without_count() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let existing = harness.contact(Some("+15551234567"), None).await;
    let usecase = RecordInboundUseCase::new(harness.contact_repo(), harness.message_repo());

    let message = usecase
        .execute(InboundMessageRequest {
            from: "+15551234567".to_string(),
            body: None,
            message_sid: "SM1".to_string(),
            num_media: 0,
            media_url: Some("https://media.example.com/ignored.jpg".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(message.channel, Channel::Sms);
    assert_eq!(message.contact_id, existing.id);
    assert_eq!(message.content, "");
    assert!(message.media_url.is_none());
}

#[tokio::test]
async fn listing_filters_by_channel_and_displayed_status() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness
        .contact(Some("+15551234567"), Some("ada@example.com"))
        .await;
    let usecase = dispatcher(&harness);
    usecase.execute(request(contact.id, "sms")).await.unwrap();
    usecase.execute(request(contact.id, "email")).await.unwrap();
    harness
        .scheduled_message(&contact, Channel::Sms, Utc::now() + Duration::hours(1))
        .await;

    let listing = ListMessagesUseCase::new(harness.message_repo());

    let sms = listing
        .execute(MessageFilter {
            channel: Some(Channel::Sms),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(sms.len(), 2);

    let queued = listing
        .execute(MessageFilter {
            status: Some("queued".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(queued.len(), 2);
    assert!(queued.iter().all(|m| m.status.kind() == "delivered"));

    let capped = listing
        .execute(MessageFilter {
            contact_id: Some(contact.id),
            limit: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);
}

/// Message store that is unavailable for writes.
struct ReadOnlyMessages;

#[async_trait]
impl MessageRepository for ReadOnlyMessages {
    async fn insert(&self, _message: NewMessage) -> anyhow::Result<Message> {
        anyhow::bail!("database is read-only")
    }

    async fn get(&self, _id: Uuid) -> anyhow::Result<Option<Message>> {
        Ok(None)
    }

    async fn list(&self, _filter: &MessageFilter) -> anyhow::Result<Vec<Message>> {
        Ok(Vec::new())
    }

    async fn list_scheduled(&self) -> anyhow::Result<Vec<Message>> {
        Ok(Vec::new())
    }

    async fn list_due(&self, _now: DateTime<Utc>) -> anyhow::Result<Vec<Message>> {
        Ok(Vec::new())
    }

    async fn claim(&self, _id: Uuid) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn complete(
        &self,
        _id: Uuid,
        _status: MessageStatus,
        _sent_at: Option<DateTime<Utc>>,
        _metadata: Option<Value>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("database is read-only")
    }
}

#[tokio::test]
async fn sent_message_that_cannot_be_stored_keeps_provider_id_in_error() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let contact = harness.contact(Some("+15551234567"), None).await;
    let usecase = DispatchMessageUseCase::new(
        harness.contact_repo(),
        Arc::new(ReadOnlyMessages),
        harness.sender_factory(),
    );

    let err = usecase
        .execute(request(contact.id, "sms"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Other(_)));
    assert!(err.to_string().contains("mock-1"), "{err}");
    assert_eq!(harness.senders.call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_first_messages_from_one_number_share_a_contact() {
    let harness = Harness::new(RecordingFactory::new("queued"));
    let usecase = Arc::new(RecordInboundUseCase::new(
        harness.contact_repo(),
        harness.message_repo(),
    ));

    let mut inbound = JoinSet::new();
    for n in 0..8 {
        let usecase = usecase.clone();
        inbound.spawn(async move {
            usecase
                .execute(InboundMessageRequest {
                    from: "whatsapp:+15551234567".to_string(),
                    body: Some(format!("message {n}")),
                    message_sid: format!("SM{n}"),
                    num_media: 0,
                    media_url: None,
                })
                .await
        });
    }

    let mut contact_ids = Vec::new();
    while let Some(result) = inbound.join_next().await {
        contact_ids.push(result.unwrap().unwrap().contact_id);
    }

    assert_eq!(contact_ids.len(), 8);
    contact_ids.sort();
    contact_ids.dedup();
    assert_eq!(contact_ids.len(), 1);
    let (contact, created) = harness
        .contacts
        .find_or_create_by_phone("+15551234567")
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(contact.id, contact_ids[0]);
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::domain::{
    models::{Channel, Contact, Direction, Message, MessageStatus, NewContact, NewMessage},
    repositories::{ContactRepository, MessageFilter, MessageRepository},
};

pub type PgPool = Pool<Postgres>;

const MESSAGE_COLUMNS: &str = "id, contact_id, user_id, channel, direction, content, media_url, \
     status, provider_status, scheduled_at, sent_at, metadata, created_at";

#[derive(Clone)]
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Contact>> {
        let record = sqlx::query_as::<_, ContactRecord>(
            r#"
            SELECT id, name, phone, email, social_handles, metadata, created_at, updated_at
            FROM contacts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(Contact::from))
    }

    async fn insert(&self, contact: NewContact) -> anyhow::Result<Contact> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, ContactRecord>(
            r#"
            INSERT INTO contacts (
                id, name, phone, email, social_handles, metadata, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING id, name, phone, email, social_handles, metadata, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(&contact.social_handles)
        .bind(&contact.metadata)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(record.into())
    }

    async fn find_or_create_by_phone(&self, phone: &str) -> anyhow::Result<(Contact, bool)> {
        let mut tx = self.pool.begin().await?;

        // serializes find-or-create per phone until commit; phone is not unique
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(phone)
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, ContactRecord>(
            r#"
            SELECT id, name, phone, email, social_handles, metadata, created_at, updated_at
            FROM contacts
            WHERE phone = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(record) = existing {
            tx.commit().await?;
            return Ok((record.into(), false));
        }

        let now = Utc::now();
        let record = sqlx::query_as::<_, ContactRecord>(
            r#"
            INSERT INTO contacts (id, phone, created_at, updated_at)
            VALUES ($1,$2,$3,$4)
            RETURNING id, name, phone, email, social_handles, metadata, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok((record.into(), true))
    }
}

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(&self, message: NewMessage) -> anyhow::Result<Message> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO messages (
                id, contact_id, user_id, channel, direction, content, media_url,
                status, provider_status, scheduled_at, sent_at, metadata, created_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(message.contact_id)
        .bind(message.user_id)
        .bind(message.channel.as_str())
        .bind(message.direction.as_str())
        .bind(&message.content)
        .bind(&message.media_url)
        .bind(message.status.kind())
        .bind(message.status.provider_status())
        .bind(message.scheduled_at)
        .bind(message.sent_at)
        .bind(&message.metadata)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Message::try_from(row)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Message::try_from).transpose()
    }

    async fn list(&self, filter: &MessageFilter) -> anyhow::Result<Vec<Message>> {
        // provider_status is only set for delivered rows, so the COALESCE
        // matches MessageStatus::as_str
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE ($1::uuid IS NULL OR contact_id = $1)
              AND ($2::text IS NULL OR channel = $2)
              AND ($3::text IS NULL OR COALESCE(provider_status, status) = $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#
        ))
        .bind(filter.contact_id)
        .bind(filter.channel.map(|c| c.as_str()))
        .bind(filter.status.as_deref())
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn list_scheduled(&self) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE status = 'scheduled'
            ORDER BY scheduled_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE status = 'scheduled'
              AND scheduled_at <= $1
            ORDER BY scheduled_at ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn claim(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'sending'
            WHERE id = $1
              AND status = 'scheduled'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
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
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = $2,
                provider_status = $3,
                sent_at = COALESCE($4, sent_at),
                metadata = COALESCE($5, metadata)
            WHERE id = $1
              AND status = 'sending'
            "#,
        )
        .bind(id)
        .bind(status.kind())
        .bind(status.provider_status())
        .bind(sent_at)
        .bind(metadata)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            anyhow::bail!("message {id} is not claimed for delivery");
        }
        Ok(())
    }
}

#[derive(FromRow)]
struct ContactRecord {
    id: Uuid,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    social_handles: Option<Value>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRecord> for Contact {
    fn from(value: ContactRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            phone: value.phone,
            email: value.email,
            social_handles: value.social_handles,
            metadata: value.metadata,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<sqlx::postgres::PgRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: sqlx::postgres::PgRow) -> Result<Self, Self::Error> {
        let channel_str: String = row.try_get("channel")?;
        let channel: Channel = channel_str.parse()?;
        let direction_str: String = row.try_get("direction")?;
        let direction = Direction::parse(&direction_str)
            .ok_or_else(|| anyhow::anyhow!("unknown direction {direction_str}"))?;
        let status_str: String = row.try_get("status")?;
        let provider_status: Option<String> = row.try_get("provider_status")?;
        let status = message_status_from_fields(&status_str, provider_status)?;

        Ok(Message {
            id: row.try_get("id")?,
            contact_id: row.try_get("contact_id")?,
            user_id: row.try_get("user_id")?,
            channel,
            direction,
            content: row.try_get("content")?,
            media_url: row.try_get("media_url")?,
            status,
            scheduled_at: row.try_get("scheduled_at")?,
            sent_at: row.try_get("sent_at")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn message_status_from_fields(
    status: &str,
    provider_status: Option<String>,
) -> anyhow::Result<MessageStatus> {
    Ok(match status {
        "scheduled" => MessageStatus::Scheduled,
        "sending" => MessageStatus::Sending,
        "delivered" => MessageStatus::Delivered(
            provider_status.ok_or_else(|| anyhow::anyhow!("delivered message without provider status"))?,
        ),
        "failed" => MessageStatus::Failed,
        "received" => MessageStatus::Received,
        other => anyhow::bail!("unknown message status {other}"),
    })
}

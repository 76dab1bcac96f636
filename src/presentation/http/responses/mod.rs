use poem_openapi::Object;
use serde_json::Value;
use uuid::Uuid;

use crate::presentation::models::{ChannelKind, DirectionKind, StatusKindDto};

#[derive(Object)]
pub struct ContactDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handles: Option<Value>,
    pub metadata: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct MessageDto {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Option<Uuid>,
    pub channel: ChannelKind,
    pub direction: DirectionKind,
    pub content: String,
    pub media_url: Option<String>,
    /// Provider status for delivered messages, lifecycle name otherwise.
    pub status: String,
    pub status_kind: StatusKindDto,
    pub scheduled_at: Option<String>,
    pub sent_at: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: String,
}

#[derive(Object)]
pub struct SweepReportDto {
    pub due: u32,
    pub claimed: u32,
    pub delivered: u32,
    pub failed: u32,
    pub skipped: u32,
}

#[derive(Object)]
pub struct HealthDto {
    pub status: String,
    /// `postgres` or `memory`.
    pub storage: String,
    /// Set when the in-process sweep ticker is running.
    pub sweep_interval_secs: Option<u64>,
}

use chrono::{DateTime, Utc};
use poem_openapi::Object;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Object, Debug)]
pub struct CreateContactRequestDto {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handles: Option<Value>,
    pub metadata: Option<Value>,
}

#[derive(Object, Debug)]
pub struct SendMessageRequestDto {
    pub contact_id: Uuid,
    /// One of `sms`, `whatsapp`, `email`.
    #[oai(validator(min_length = 1))]
    pub channel: String,
    #[oai(validator(min_length = 1))]
    pub content: String,
    /// Deliver later through the scheduled sweep instead of now.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
    pub media_url: Option<String>,
}

/// Form fields Twilio posts for an incoming SMS or WhatsApp message.
/// Decoded by serde, so every field carries both renames.
#[derive(Object, Deserialize, Debug)]
pub struct TwilioWebhookForm {
    #[oai(rename = "From")]
    #[serde(rename = "From")]
    pub from: String,
    #[oai(rename = "Body")]
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[oai(rename = "MessageSid")]
    #[serde(rename = "MessageSid")]
    pub message_sid: String,
    #[oai(rename = "NumMedia")]
    #[serde(rename = "NumMedia")]
    pub num_media: Option<String>,
    #[oai(rename = "MediaUrl0")]
    #[serde(rename = "MediaUrl0")]
    pub media_url0: Option<String>,
}

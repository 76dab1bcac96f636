use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::channel::Channel;
use crate::domain::errors::DispatchError;

#[derive(Debug, Clone)]
pub struct Contact {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handles: Option<Value>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Raw address stored for `channel`, without any emptiness check.
    pub fn address(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email => self.email.as_deref(),
            Channel::Sms | Channel::Whatsapp => self.phone.as_deref(),
        }
    }

    /// Address for `channel`, or `None` when the field is absent or blank.
    pub fn deliverable_address(&self, channel: Channel) -> Option<&str> {
        self.address(channel)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handles: Option<Value>,
    pub metadata: Option<Value>,
}

impl NewContact {
    /// Trims address fields, turning blanks into `None`, and checks that the
    /// contact is reachable on at least one channel.
    pub fn normalized(mut self) -> Result<Self, DispatchError> {
        self.name = non_blank(self.name);
        self.phone = non_blank(self.phone);
        self.email = non_blank(self.email);

        if self.phone.is_none() && self.email.is_none() {
            return Err(DispatchError::Validation(
                "at least phone or email required".to_string(),
            ));
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

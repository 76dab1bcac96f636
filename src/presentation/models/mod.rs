use poem_openapi::Enum;

use crate::domain::models::{Channel, Direction, MessageStatus};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelKind {
    #[oai(rename = "sms")]
    Sms,
    #[oai(rename = "whatsapp")]
    Whatsapp,
    #[oai(rename = "email")]
    Email,
}

impl From<ChannelKind> for Channel {
    fn from(value: ChannelKind) -> Self {
        match value {
            ChannelKind::Sms => Channel::Sms,
            ChannelKind::Whatsapp => Channel::Whatsapp,
            ChannelKind::Email => Channel::Email,
        }
    }
}

impl From<Channel> for ChannelKind {
    fn from(value: Channel) -> Self {
        match value {
            Channel::Sms => ChannelKind::Sms,
            Channel::Whatsapp => ChannelKind::Whatsapp,
            Channel::Email => ChannelKind::Email,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DirectionKind {
    #[oai(rename = "inbound")]
    Inbound,
    #[oai(rename = "outbound")]
    Outbound,
}

impl From<Direction> for DirectionKind {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Inbound => DirectionKind::Inbound,
            Direction::Outbound => DirectionKind::Outbound,
        }
    }
}

/// Fixed lifecycle stage of a message; the provider's own wording is
/// reported separately in `status`.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatusKindDto {
    #[oai(rename = "scheduled")]
    Scheduled,
    #[oai(rename = "sending")]
    Sending,
    #[oai(rename = "delivered")]
    Delivered,
    #[oai(rename = "failed")]
    Failed,
    #[oai(rename = "received")]
    Received,
}

impl From<&MessageStatus> for StatusKindDto {
    fn from(value: &MessageStatus) -> Self {
        match value {
            MessageStatus::Scheduled => StatusKindDto::Scheduled,
            MessageStatus::Sending => StatusKindDto::Sending,
            MessageStatus::Delivered(_) => StatusKindDto::Delivered,
            MessageStatus::Failed => StatusKindDto::Failed,
            MessageStatus::Received => StatusKindDto::Received,
        }
    }
}

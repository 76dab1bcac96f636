use crate::{
    application::usecases::run_sweep::SweepReport,
    domain::models::{Contact, Message},
    presentation::{
        http::responses::{ContactDto, MessageDto, SweepReportDto},
        models::StatusKindDto,
    },
};

pub fn map_contact(contact: &Contact) -> ContactDto {
    ContactDto {
        id: contact.id,
        name: contact.name.clone(),
        phone: contact.phone.clone(),
        email: contact.email.clone(),
        social_handles: contact.social_handles.clone(),
        metadata: contact.metadata.clone(),
        created_at: contact.created_at.to_rfc3339(),
        updated_at: contact.updated_at.to_rfc3339(),
    }
}

pub fn map_message(message: &Message) -> MessageDto {
    MessageDto {
        id: message.id,
        contact_id: message.contact_id,
        user_id: message.user_id,
        channel: message.channel.into(),
        direction: message.direction.into(),
        content: message.content.clone(),
        media_url: message.media_url.clone(),
        status: message.status.as_str().to_string(),
        status_kind: StatusKindDto::from(&message.status),
        scheduled_at: message.scheduled_at.map(|at| at.to_rfc3339()),
        sent_at: message.sent_at.map(|at| at.to_rfc3339()),
        metadata: message.metadata.clone(),
        created_at: message.created_at.to_rfc3339(),
    }
}

pub fn map_sweep_report(report: &SweepReport) -> SweepReportDto {
    SweepReportDto {
        due: report.due as u32,
        claimed: report.claimed as u32,
        delivered: report.delivered as u32,
        failed: report.failed as u32,
        skipped: report.skipped as u32,
    }
}

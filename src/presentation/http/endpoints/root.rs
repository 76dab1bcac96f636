use std::sync::Arc;

use poem_openapi::Tags;

use crate::{
    application::{
        services::sender::SenderFactory,
        usecases::{
            create_contact::CreateContactUseCase, dispatch_message::DispatchMessageUseCase,
            list_messages::ListMessagesUseCase, list_scheduled::ListScheduledUseCase,
            record_inbound::RecordInboundUseCase, run_sweep::RunSweepUseCase,
        },
    },
    domain::repositories::{ContactRepository, MessageRepository},
};

#[derive(Clone)]
pub struct ApiState {
    pub create_contact_usecase: Arc<CreateContactUseCase>,
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub list_scheduled_usecase: Arc<ListScheduledUseCase>,
    pub record_inbound_usecase: Arc<RecordInboundUseCase>,
    pub run_sweep_usecase: Arc<RunSweepUseCase>,
}

impl ApiState {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        messages: Arc<dyn MessageRepository>,
        senders: Arc<dyn SenderFactory>,
    ) -> Self {
        Self {
            create_contact_usecase: Arc::new(CreateContactUseCase::new(contacts.clone())),
            dispatch_message_usecase: Arc::new(DispatchMessageUseCase::new(
                contacts.clone(),
                messages.clone(),
                senders.clone(),
            )),
            list_messages_usecase: Arc::new(ListMessagesUseCase::new(messages.clone())),
            list_scheduled_usecase: Arc::new(ListScheduledUseCase::new(messages.clone())),
            record_inbound_usecase: Arc::new(RecordInboundUseCase::new(
                contacts.clone(),
                messages.clone(),
            )),
            run_sweep_usecase: Arc::new(RunSweepUseCase::new(contacts, messages, senders)),
        }
    }
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Contacts,
    Messages,
    Scheduled,
    Webhooks,
}

use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Query, payload::Json};
use uuid::Uuid;

use crate::{
    application::usecases::dispatch_message::DispatchRequest,
    domain::repositories::MessageFilter,
    presentation::{
        http::{
            endpoints::root::{ApiState, EndpointsTags},
            errors::{dispatch_error, internal_error},
            mappers::map_message,
            requests::SendMessageRequestDto,
            responses::MessageDto,
        },
        models::ChannelKind,
    },
};

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    /// Send a message now, or schedule it when `scheduled_at` is given.
    #[oai(path = "/messages", method = "post", tag = EndpointsTags::Messages)]
    pub async fn send_message(
        &self,
        request: Json<SendMessageRequestDto>,
    ) -> PoemResult<Json<MessageDto>> {
        let request = request.0;
        let message = self
            .state
            .dispatch_message_usecase
            .execute(DispatchRequest {
                contact_id: request.contact_id,
                channel: request.channel,
                content: request.content,
                scheduled_at: request.scheduled_at,
                user_id: request.user_id,
                media_url: request.media_url,
            })
            .await
            .map_err(dispatch_error)?;

        Ok(Json(map_message(&message)))
    }

    #[oai(path = "/messages", method = "get", tag = EndpointsTags::Messages)]
    pub async fn list_messages(
        &self,
        contact_id: Query<Option<Uuid>>,
        channel: Query<Option<ChannelKind>>,
        status: Query<Option<String>>,
    ) -> PoemResult<Json<Vec<MessageDto>>> {
        let filter = MessageFilter {
            contact_id: contact_id.0,
            channel: channel.0.map(Into::into),
            status: status.0,
            ..Default::default()
        };

        let messages = self
            .state
            .list_messages_usecase
            .execute(filter)
            .await
            .map_err(internal_error)?;

        Ok(Json(messages.iter().map(map_message).collect()))
    }
}

use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{
    ApiResponse, OpenApi,
    payload::{Form, PlainText},
};

use crate::{
    application::usecases::record_inbound::InboundMessageRequest,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::dispatch_error,
        requests::TwilioWebhookForm,
    },
};

const EMPTY_TWIML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

#[derive(ApiResponse)]
pub enum TwimlResponse {
    #[oai(status = 200, content_type = "text/xml")]
    Ok(PlainText<String>),
}

#[derive(Clone)]
pub struct WebhookEndpoints {
    state: Arc<ApiState>,
}

impl WebhookEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl WebhookEndpoints {
    /// Incoming SMS and WhatsApp messages from Twilio.
    #[oai(path = "/webhooks/twilio", method = "post", tag = EndpointsTags::Webhooks)]
    pub async fn twilio(&self, form: Form<TwilioWebhookForm>) -> PoemResult<TwimlResponse> {
        let form = form.0;
        let num_media = form
            .num_media
            .as_deref()
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(0);

        self.state
            .record_inbound_usecase
            .execute(InboundMessageRequest {
                from: form.from,
                body: form.body,
                message_sid: form.message_sid,
                num_media,
                media_url: form.media_url0,
            })
            .await
            .map_err(dispatch_error)?;

        Ok(TwimlResponse::Ok(PlainText(EMPTY_TWIML.to_string())))
    }
}

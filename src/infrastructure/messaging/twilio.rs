use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    application::services::sender::{ChannelSender, SendReceipt, SendRequest},
    domain::{errors::TransportError, models::Channel},
};

const PROVIDER: &str = "twilio";
const WHATSAPP_PREFIX: &str = "whatsapp:";

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Origin number shared by the SMS and WhatsApp senders.
    pub from_number: String,
    pub api_base_url: String,
}

#[derive(Clone)]
struct TwilioApi {
    http: Client,
    config: Arc<TwilioConfig>,
}

impl TwilioApi {
    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    async fn create_message(
        &self,
        from: &str,
        to: &str,
        request: &SendRequest,
    ) -> Result<SendReceipt, TransportError> {
        let mut form = vec![("To", to), ("From", from), ("Body", request.content.as_str())];
        if let Some(media_url) = request.media_url.as_deref() {
            form.push(("MediaUrl", media_url));
        }

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorResponse>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(TransportError::Rejected {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let payload: TwilioMessageResponse =
            response
                .json()
                .await
                .map_err(|source| TransportError::Request {
                    provider: PROVIDER,
                    source,
                })?;

        Ok(SendReceipt {
            external_id: payload.sid,
            status: payload.status,
        })
    }
}

pub struct TwilioSmsSender {
    api: TwilioApi,
}

impl TwilioSmsSender {
    pub fn new(http: Client, config: Arc<TwilioConfig>) -> Self {
        Self {
            api: TwilioApi { http, config },
        }
    }
}

#[async_trait]
impl ChannelSender for TwilioSmsSender {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, TransportError> {
        self.api
            .create_message(&self.api.config.from_number, &request.to, request)
            .await
    }
}

/// Same Twilio endpoint as SMS, with both addresses framed as WhatsApp ones.
pub struct TwilioWhatsAppSender {
    api: TwilioApi,
}

impl TwilioWhatsAppSender {
    pub fn new(http: Client, config: Arc<TwilioConfig>) -> Self {
        Self {
            api: TwilioApi { http, config },
        }
    }
}

#[async_trait]
impl ChannelSender for TwilioWhatsAppSender {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, TransportError> {
        let from = format!("{WHATSAPP_PREFIX}{}", self.api.config.from_number);
        let to = format!("{WHATSAPP_PREFIX}{}", request.to);
        self.api.create_message(&from, &to, request).await
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    message: String,
}

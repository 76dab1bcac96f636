use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    application::services::sender::{ChannelSender, SendReceipt, SendRequest},
    domain::{errors::TransportError, models::Channel},
};

const PROVIDER: &str = "resend";
/// Resend does not report delivery state when accepting a message.
const ACCEPTED_STATUS: &str = "sent";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub from: String,
    pub subject: String,
}

pub struct ResendEmailSender {
    http: Client,
    config: Arc<EmailConfig>,
}

impl ResendEmailSender {
    pub fn new(http: Client, config: Arc<EmailConfig>) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl ChannelSender for ResendEmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    /// Media references are dropped; attachments are not supported.
    async fn send(&self, request: &SendRequest) -> Result<SendReceipt, TransportError> {
        let url = format!("{}/emails", self.config.api_base_url.trim_end_matches('/'));
        let payload = ResendEmail {
            from: &self.config.from,
            to: [request.to.as_str()],
            subject: &self.config.subject,
            text: &request.content,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendErrorResponse>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(TransportError::Rejected {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let created: ResendEmailResponse =
            response
                .json()
                .await
                .map_err(|source| TransportError::Request {
                    provider: PROVIDER,
                    source,
                })?;

        Ok(SendReceipt {
            external_id: created.id,
            status: ACCEPTED_STATUS.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    message: String,
}

use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::infrastructure::messaging::{EmailConfig, TwilioConfig};

const DEFAULT_TWILIO_API_BASE_URL: &str = "https://api.twilio.com";
const DEFAULT_RESEND_API_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_EMAIL_FROM: &str = "onboarding@resend.dev";
const DEFAULT_EMAIL_SUBJECT: &str = "New Message";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("An error occured while getting {0} env param")]
    Missing(&'static str),
    #[error("An error occured while parsing {name} env param: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub bind_host: String,
    /// When absent the service keeps everything in memory.
    pub database_url: Option<String>,
    pub twilio: TwilioConfig,
    pub email: EmailConfig,
    pub provider_timeout: Duration,
    pub sweep_interval: Option<Duration>,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();

        Ok(Config {
            port: parsed("PORT")?.ok_or(ConfigError::Missing("PORT"))?,
            scheme: required("SCHEME")?,
            host: required("HOST")?,
            bind_host: optional("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: optional("DATABASE_URL"),
            twilio: TwilioConfig {
                account_sid: required("TWILIO_ACCOUNT_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
                from_number: required("TWILIO_PHONE_NUMBER")?,
                api_base_url: optional("TWILIO_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE_URL.to_string()),
            },
            email: EmailConfig {
                api_key: required("RESEND_API_KEY")?,
                api_base_url: optional("RESEND_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_API_BASE_URL.to_string()),
                from: optional("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
                subject: optional("EMAIL_SUBJECT")
                    .unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string()),
            },
            provider_timeout: Duration::from_secs(
                parsed("PROVIDER_TIMEOUT_SECS")?.unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            ),
            sweep_interval: parsed::<u64>("SWEEP_INTERVAL_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }
}

fn optional(name: &'static str) -> Option<String> {
    var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
                name,
                reason: err.to_string(),
            })
        })
        .transpose()
}

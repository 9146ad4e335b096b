//! Resend email adapter.
//!
//! Built once at startup from optional configuration. Without an API key
//! every send reports `EmailError::NotConfigured`, which callers treat as
//! "skip" rather than failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{EmailError, EmailMessage, EmailSender};

pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendConfig {
    pub api_key: SecretString,
    /// Full `From` header, e.g. `CoopManager <noreply@coopmanager.app>`.
    pub from: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

struct Configured {
    config: ResendConfig,
    client: Client,
}

pub struct ResendEmailSender {
    inner: Option<Configured>,
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            inner: Some(Configured { config, client }),
        })
    }

    /// A sender that reports `NotConfigured` for every message.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn from_optional(config: Option<ResendConfig>) -> Result<Self, EmailError> {
        match config {
            Some(config) => Self::new(config),
            None => Ok(Self::disabled()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let Some(Configured { config, client }) = &self.inner else {
            return Err(EmailError::NotConfigured);
        };

        let body = ResendRequest {
            from: &config.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = client
            .post(&config.endpoint)
            .bearer_auth(config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(subject = %message.subject, "Email accepted by Resend");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(EmailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for ResendEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailSender")
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

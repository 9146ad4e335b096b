//! Expo push notification client.
//!
//! Sends one message per call to the Expo push API. Tokens that are not
//! Expo push tokens are refused before any request is made.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_EXPO_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

/// Configuration for the Expo client.
#[derive(Clone)]
pub struct ExpoPushConfig {
    pub endpoint: String,
    /// Enhanced-security access token, when the Expo project requires one.
    pub access_token: Option<SecretString>,
    pub timeout: Duration,
}

impl ExpoPushConfig {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_EXPO_ENDPOINT.to_string(),
            access_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ExpoPushConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("not an Expo push token: {0}")]
    InvalidToken(String),

    #[error("push rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("push transport failed: {0}")]
    Transport(String),
}

/// True for `ExponentPushToken[...]` and `ExpoPushToken[...]`.
pub fn is_expo_push_token(token: &str) -> bool {
    ["ExponentPushToken[", "ExpoPushToken["]
        .iter()
        .any(|prefix| token.starts_with(prefix) && token.ends_with(']') && token.len() > prefix.len() + 1)
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: ExpoTicket,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

pub struct ExpoPushClient {
    config: ExpoPushConfig,
    client: Client,
}

impl ExpoPushClient {
    pub fn new(config: ExpoPushConfig) -> Result<Self, PushError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PushError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        if !is_expo_push_token(&message.to) {
            return Err(PushError::InvalidToken(message.to.clone()));
        }

        let mut request = self.client.post(&self.config.endpoint).json(message);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        let ticket: ExpoResponse = response
            .json()
            .await
            .map_err(|e| PushError::Transport(format!("Unreadable push response: {}", e)))?;

        if ticket.data.status == "ok" {
            tracing::debug!("Push notification accepted");
            Ok(())
        } else {
            Err(PushError::Rejected {
                status: status.as_u16(),
                message: ticket.data.message.unwrap_or(ticket.data.status),
            })
        }
    }
}

impl std::fmt::Debug for ExpoPushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpoPushClient")
            .field("endpoint", &self.config.endpoint)
            .finish_non_exhaustive()
    }
}

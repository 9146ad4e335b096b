//! Email delivery port.

use async_trait::async_trait;
use thiserror::Error;

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    /// No email provider is configured for this deployment.
    #[error("email delivery is not configured")]
    NotConfigured,

    /// The provider answered with a non-success status.
    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The request never got an answer.
    #[error("email transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn EmailSender) {}
    }
}

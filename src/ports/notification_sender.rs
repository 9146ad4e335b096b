//! In-app notification port.
//!
//! Creates a notification for a user and attempts push delivery. Callers
//! treat every failure as non-fatal.

use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Category of a notification, used by clients to route taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AjoInvitation,
    AjoInvitationResponse,
    AjoPayment,
    AjoClosed,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AjoInvitation => "ajo_invitation",
            NotificationKind::AjoInvitationResponse => "ajo_invitation_response",
            NotificationKind::AjoPayment => "ajo_payment",
            NotificationKind::AjoClosed => "ajo_closed",
        }
    }
}

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub data: Value,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Store the notification and push it to the user's devices.
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn NotificationSender) {}
    }

    #[test]
    fn kind_names_match_serde() {
        let json = serde_json::to_string(&NotificationKind::AjoInvitationResponse).unwrap();
        assert_eq!(json, format!("\"{}\"", NotificationKind::AjoInvitationResponse.as_str()));
    }
}

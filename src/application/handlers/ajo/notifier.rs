//! Best-effort fan-out of in-app notifications and emails.
//!
//! Delivery never fails the request that triggered it. In `Background`
//! mode the work is spawned on the runtime and the request returns
//! immediately; in `Inline` mode it is awaited, which keeps tests
//! deterministic. Either way failures are only logged.

use std::sync::Arc;

use crate::ports::{EmailError, EmailMessage, EmailSender, Notification, NotificationSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    #[default]
    Background,
    Inline,
}

/// Notifications and emails produced by one command.
#[derive(Debug, Clone, Default)]
pub struct Deliveries {
    pub notifications: Vec<Notification>,
    pub emails: Vec<EmailMessage>,
}

impl Deliveries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn email(&mut self, message: EmailMessage) {
        self.emails.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.emails.is_empty()
    }
}

#[derive(Clone)]
pub struct AjoNotifier {
    notifications: Arc<dyn NotificationSender>,
    email: Arc<dyn EmailSender>,
    mode: DeliveryMode,
}

impl AjoNotifier {
    pub fn new(
        notifications: Arc<dyn NotificationSender>,
        email: Arc<dyn EmailSender>,
        mode: DeliveryMode,
    ) -> Self {
        Self {
            notifications,
            email,
            mode,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub async fn dispatch(&self, deliveries: Deliveries) {
        if deliveries.is_empty() {
            return;
        }
        match self.mode {
            DeliveryMode::Inline => self.deliver(deliveries).await,
            DeliveryMode::Background => {
                let notifier = self.clone();
                tokio::spawn(async move { notifier.deliver(deliveries).await });
            }
        }
    }

    async fn deliver(&self, deliveries: Deliveries) {
        for notification in deliveries.notifications {
            let user_id = notification.user_id.clone();
            let kind = notification.kind;
            if let Err(e) = self.notifications.notify(notification).await {
                tracing::warn!(
                    user_id = %user_id,
                    kind = kind.as_str(),
                    error = %e,
                    "Failed to create notification"
                );
            }
        }

        for message in deliveries.emails {
            let to = message.to.clone();
            match self.email.send(message).await {
                Ok(()) => {}
                Err(EmailError::NotConfigured) => {
                    tracing::debug!(to = %to, "Email delivery not configured, skipping");
                }
                Err(e) => {
                    tracing::warn!(to = %to, error = %e, "Failed to send email");
                }
            }
        }
    }
}

//! Recording adapters for the delivery and audit ports.
//!
//! Each one keeps what it was handed so tests can assert on it, and can be
//! switched to fail every call to exercise the best-effort paths.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::activity::ActivityRecord;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    ActivityLog, EmailError, EmailMessage, EmailSender, Notification, NotificationSender,
};

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "recorder lock poisoned")
}

/// Activity log kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryActivityLog {
    records: Mutex<Vec<ActivityRecord>>,
    fail: bool,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.records.lock().expect("InMemoryActivityLog: lock poisoned").clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.action).collect()
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, record: ActivityRecord) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::database("activity log unavailable"));
        }
        self.records.lock().map_err(|_| poisoned())?.push(record);
        Ok(())
    }
}

/// Notification sender that keeps every notification.
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .expect("RecordingNotificationSender: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::database("notifications unavailable"));
        }
        self.sent.lock().map_err(|_| poisoned())?.push(notification);
        Ok(())
    }
}

/// Email sender that keeps every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .expect("RecordingEmailSender: lock poisoned")
            .clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.to).collect()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Transport("connection refused".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| EmailError::Transport("recorder lock poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}

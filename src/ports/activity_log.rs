//! Activity (audit) log port. Append-only.

use crate::domain::activity::ActivityRecord;
use crate::domain::foundation::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append one record.
    async fn record(&self, record: ActivityRecord) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_log_is_object_safe() {
        fn _accepts_dyn(_log: &dyn ActivityLog) {}
    }
}

//! PostgreSQL implementation of ActivityLog.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::activity::ActivityRecord;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ActivityLog;

use super::rows::db_error;

/// Appends rows to `activity_logs`.
pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    async fn record(&self, record: ActivityRecord) -> Result<(), DomainError> {
        let metadata = serde_json::to_string(&record.metadata).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode activity metadata: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, user_id, action, description, cooperative_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6::jsonb, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.actor.as_str())
        .bind(&record.action)
        .bind(&record.description)
        .bind(record.cooperative_id.map(|id| *id.as_uuid()))
        .bind(metadata)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert activity log"))?;

        Ok(())
    }
}

//! PostgreSQL implementation of NotificationSender.
//!
//! Every notification becomes an in-app row in `notifications`. When push
//! delivery is configured and the user has registered a device token, the
//! same title and body are also pushed through Expo.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::adapters::push::{ExpoPushClient, PushMessage};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notification, NotificationSender};

use super::rows::db_error;

pub struct PostgresNotificationSender {
    pool: PgPool,
    push: Option<ExpoPushClient>,
}

impl PostgresNotificationSender {
    pub fn new(pool: PgPool, push: Option<ExpoPushClient>) -> Self {
        Self { pool, push }
    }

    async fn push_token(&self, notification: &Notification) -> Result<Option<String>, DomainError> {
        let token: Option<(Option<String>,)> =
            sqlx::query_as("SELECT expo_push_token FROM users WHERE id = $1")
                .bind(notification.user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to load push token"))?;

        Ok(token.and_then(|(token,)| token).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl NotificationSender for PostgresNotificationSender {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        let data = serde_json::to_string(&notification.data).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode notification data: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, type, title, body, data, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6::jsonb, FALSE, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.user_id.as_str())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert notification"))?;

        let Some(push) = &self.push else {
            return Ok(());
        };
        let Some(token) = self.push_token(&notification).await? else {
            tracing::debug!(user_id = %notification.user_id, "No push token registered");
            return Ok(());
        };

        let message = PushMessage {
            to: token,
            title: notification.title,
            body: notification.body,
            data: notification.data,
        };
        // The in-app row is already stored; a failed push only loses the banner.
        if let Err(e) = push.send(&message).await {
            tracing::warn!(
                user_id = %notification.user_id,
                error = %e,
                "Push notification failed"
            );
        }

        Ok(())
    }
}

//! PostgreSQL implementation of AjoRepository.
//!
//! Writes that touch more than one row run inside a single transaction, so
//! a payment and the member's running total are never out of step.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment, AjoSettings, AjoStatus};
use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode};
use crate::ports::AjoRepository;

use super::rows::{db_error, AjoMemberRow, SettingsRow, MEMBER_COLUMNS};

pub struct PostgresAjoRepository {
    pool: PgPool,
}

impl PostgresAjoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AjoRepository for PostgresAjoRepository {
    async fn find_or_create_settings(
        &self,
        cooperative_id: &CooperativeId,
    ) -> Result<AjoSettings, DomainError> {
        let defaults = AjoSettings::defaults_for(*cooperative_id);

        sqlx::query(
            r#"
            INSERT INTO ajo_settings (cooperative_id, commission_rate, interest_rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cooperative_id) DO NOTHING
            "#,
        )
        .bind(cooperative_id.as_uuid())
        .bind(defaults.commission_rate)
        .bind(defaults.interest_rate)
        .bind(defaults.created_at.as_datetime())
        .bind(defaults.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create ajo settings"))?;

        let row: SettingsRow = sqlx::query_as(
            r#"
            SELECT cooperative_id, commission_rate, interest_rate, created_at, updated_at
            FROM ajo_settings
            WHERE cooperative_id = $1
            "#,
        )
        .bind(cooperative_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to load ajo settings"))?;

        Ok(row.into())
    }

    async fn save_settings(&self, settings: &AjoSettings) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO ajo_settings (cooperative_id, commission_rate, interest_rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cooperative_id) DO UPDATE SET
                commission_rate = EXCLUDED.commission_rate,
                interest_rate = EXCLUDED.interest_rate,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(settings.cooperative_id.as_uuid())
        .bind(settings.commission_rate)
        .bind(settings.interest_rate)
        .bind(settings.created_at.as_datetime())
        .bind(settings.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save ajo settings"))?;

        Ok(())
    }

    async fn create(&self, ajo: &Ajo, members: &[AjoMember]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO ajos (
                id, cooperative_id, title, description, amount, frequency, start_date,
                end_date, is_continuous, status, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(ajo.id.as_uuid())
        .bind(ajo.cooperative_id.as_uuid())
        .bind(&ajo.title)
        .bind(&ajo.description)
        .bind(ajo.amount)
        .bind(ajo.frequency.as_str())
        .bind(ajo.start_date.as_datetime())
        .bind(ajo.end_date.as_ref().map(|d| *d.as_datetime()))
        .bind(ajo.is_continuous)
        .bind(ajo.status.as_str())
        .bind(ajo.created_by.as_str())
        .bind(ajo.created_at.as_datetime())
        .bind(ajo.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert ajo"))?;

        for member in members {
            sqlx::query(
                r#"
                INSERT INTO ajo_members (ajo_id, member_id, status, total_paid, invited_at, responded_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(member.ajo_id.as_uuid())
            .bind(member.member_id.as_uuid())
            .bind(member.status.as_str())
            .bind(member.total_paid)
            .bind(member.invited_at.as_datetime())
            .bind(member.responded_at.as_ref().map(|d| *d.as_datetime()))
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to insert ajo member"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        Ok(())
    }

    async fn update(&self, ajo: &Ajo, expected_status: AjoStatus) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE ajos SET
                title = $2,
                description = $3,
                amount = $4,
                frequency = $5,
                start_date = $6,
                end_date = $7,
                is_continuous = $8,
                status = $9,
                updated_at = $10
            WHERE id = $1 AND status = $11
            "#,
        )
        .bind(ajo.id.as_uuid())
        .bind(&ajo.title)
        .bind(&ajo.description)
        .bind(ajo.amount)
        .bind(ajo.frequency.as_str())
        .bind(ajo.start_date.as_datetime())
        .bind(ajo.end_date.as_ref().map(|d| *d.as_datetime()))
        .bind(ajo.is_continuous)
        .bind(ajo.status.as_str())
        .bind(ajo.updated_at.as_datetime())
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update ajo"))?;

        if result.rows_affected() == 0 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM ajos WHERE id = $1")
                    .bind(ajo.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error("Failed to check ajo status"))?;

            return Err(match current {
                None => DomainError::new(ErrorCode::NotFound, format!("Ajo not found: {}", ajo.id)),
                Some(status) => {
                    DomainError::new(ErrorCode::BadRequest, "Ajo was changed by another request")
                        .with_detail("id", ajo.id.to_string())
                        .with_detail("status", status)
                }
            });
        }

        Ok(())
    }

    async fn update_member(&self, member: &AjoMember) -> Result<(), DomainError> {
        // total_paid is only ever changed by record_payment.
        let result = sqlx::query(
            r#"
            UPDATE ajo_members SET status = $3, responded_at = $4
            WHERE ajo_id = $1 AND member_id = $2
            "#,
        )
        .bind(member.ajo_id.as_uuid())
        .bind(member.member_id.as_uuid())
        .bind(member.status.as_str())
        .bind(member.responded_at.as_ref().map(|d| *d.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update ajo member"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::NotFound,
                format!("Ajo member not found: {}", member.member_id),
            ));
        }

        Ok(())
    }

    async fn record_payment(&self, payment: &AjoPayment) -> Result<AjoMember, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let row: Option<AjoMemberRow> = sqlx::query_as(&format!(
            r#"
            UPDATE ajo_members SET total_paid = total_paid + $3
            WHERE ajo_id = $1 AND member_id = $2
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        ))
        .bind(payment.ajo_id.as_uuid())
        .bind(payment.member_id.as_uuid())
        .bind(payment.amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to credit ajo member"))?;

        let Some(row) = row else {
            // Dropping the transaction rolls it back.
            return Err(DomainError::new(
                ErrorCode::NotFound,
                format!("Ajo member not found: {}", payment.member_id),
            ));
        };

        sqlx::query(
            r#"
            INSERT INTO ajo_payments (
                id, ajo_id, member_id, amount, payment_method, payment_date,
                reference_number, recorded_by, notes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.ajo_id.as_uuid())
        .bind(payment.member_id.as_uuid())
        .bind(payment.amount)
        .bind(&payment.payment_method)
        .bind(payment.payment_date.as_datetime())
        .bind(&payment.reference_number)
        .bind(payment.recorded_by.as_str())
        .bind(&payment.notes)
        .bind(payment.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert ajo payment"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        AjoMember::try_from(row)
    }
}

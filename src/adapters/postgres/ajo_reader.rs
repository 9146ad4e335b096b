//! PostgreSQL implementation of AjoReader.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment};
use crate::domain::foundation::{AjoId, CooperativeId, DomainError, MemberId};
use crate::ports::{AjoReader, AjoSummary, PendingInvitation};

use super::rows::{
    convert_all, db_error, AjoCountsRow, AjoMemberRow, AjoRow, PaymentRow, AJO_COLUMNS,
    AJO_COUNTS, MEMBER_COLUMNS, PAYMENT_COLUMNS,
};

pub struct PostgresAjoReader {
    pool: PgPool,
}

impl PostgresAjoReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ajos_with_counts(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, (Ajo, u64)>, DomainError> {
        let rows: Vec<AjoCountsRow> = sqlx::query_as(&format!(
            "SELECT {}, {} FROM ajos a WHERE a.id = ANY($1)",
            AJO_COLUMNS, AJO_COUNTS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load ajos"))?;

        rows.into_iter()
            .map(|row| -> Result<_, DomainError> {
                let member_count = count(row.member_count);
                let ajo = Ajo::try_from(row.ajo)?;
                Ok((*ajo.id.as_uuid(), (ajo, member_count)))
            })
            .collect()
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl AjoReader for PostgresAjoReader {
    async fn find_ajo(&self, id: &AjoId) -> Result<Option<Ajo>, DomainError> {
        let row: Option<AjoRow> =
            sqlx::query_as(&format!("SELECT {} FROM ajos a WHERE a.id = $1", AJO_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to load ajo"))?;

        row.map(Ajo::try_from).transpose()
    }

    async fn find_member(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Option<AjoMember>, DomainError> {
        let row: Option<AjoMemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ajo_members WHERE ajo_id = $1 AND member_id = $2",
            MEMBER_COLUMNS
        ))
        .bind(ajo_id.as_uuid())
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load ajo member"))?;

        row.map(AjoMember::try_from).transpose()
    }

    async fn list_for_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        viewer: &MemberId,
    ) -> Result<Vec<AjoSummary>, DomainError> {
        let rows: Vec<AjoCountsRow> = sqlx::query_as(&format!(
            "SELECT {}, {} FROM ajos a WHERE a.cooperative_id = $1 ORDER BY a.created_at DESC",
            AJO_COLUMNS, AJO_COUNTS
        ))
        .bind(cooperative_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list ajos"))?;

        let mine: Vec<AjoMemberRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM ajo_members
            WHERE member_id = $1
              AND ajo_id IN (SELECT id FROM ajos WHERE cooperative_id = $2)
            "#,
            MEMBER_COLUMNS
        ))
        .bind(viewer.as_uuid())
        .bind(cooperative_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load memberships"))?;

        let mut memberships: HashMap<AjoId, AjoMember> = convert_all::<_, AjoMember>(mine)?
            .into_iter()
            .map(|m| (m.ajo_id, m))
            .collect();

        rows.into_iter()
            .map(|row| -> Result<_, DomainError> {
                let ajo = Ajo::try_from(row.ajo)?;
                Ok(AjoSummary {
                    my_membership: memberships.remove(&ajo.id),
                    member_count: count(row.member_count),
                    payment_count: count(row.payment_count),
                    ajo,
                })
            })
            .collect()
    }

    async fn roster(&self, ajo_id: &AjoId) -> Result<Vec<AjoMember>, DomainError> {
        let rows: Vec<AjoMemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ajo_members WHERE ajo_id = $1 ORDER BY invited_at, member_id",
            MEMBER_COLUMNS
        ))
        .bind(ajo_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load ajo roster"))?;

        convert_all(rows)
    }

    async fn payments(&self, ajo_id: &AjoId) -> Result<Vec<AjoPayment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM ajo_payments
            WHERE ajo_id = $1
            ORDER BY payment_date DESC, created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(ajo_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load ajo payments"))?;

        convert_all(rows)
    }

    async fn member_payments(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Vec<AjoPayment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM ajo_payments
            WHERE ajo_id = $1 AND member_id = $2
            ORDER BY payment_date ASC, created_at ASC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(ajo_id.as_uuid())
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load member payments"))?;

        convert_all(rows)
    }

    async fn pending_invitations(
        &self,
        member_ids: &[MemberId],
    ) -> Result<Vec<PendingInvitation>, DomainError> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = member_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<AjoMemberRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM ajo_members
            WHERE member_id = ANY($1) AND status = 'pending'
            ORDER BY invited_at DESC
            "#,
            MEMBER_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load pending invitations"))?;
        let invitations: Vec<AjoMember> = convert_all(rows)?;

        let ajo_ids: Vec<Uuid> = invitations.iter().map(|m| *m.ajo_id.as_uuid()).collect();
        let ajos = self.ajos_with_counts(&ajo_ids).await?;

        Ok(invitations
            .into_iter()
            .filter_map(|invitation| {
                let (ajo, member_count) = ajos.get(invitation.ajo_id.as_uuid())?.clone();
                Some(PendingInvitation {
                    invitation,
                    ajo,
                    member_count,
                })
            })
            .collect())
    }
}

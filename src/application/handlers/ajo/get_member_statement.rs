//! GetMemberStatementHandler - Query handler for one member's statement.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::ajo::{Ajo, AjoError, AjoMember, AjoPayment, StatementSummary};
use crate::domain::cooperative::MemberIdentity;
use crate::domain::foundation::{AjoId, CommandMetadata, MemberId};
use crate::ports::{AjoReader, AjoRepository, MemberDirectory};

use super::load_ajo;

#[derive(Debug, Clone)]
pub struct GetMemberStatementQuery {
    pub ajo_id: AjoId,
    pub member_id: MemberId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStatement {
    pub ajo: Ajo,
    pub member: MemberIdentity,
    pub membership: AjoMember,
    pub summary: StatementSummary,
    /// Oldest first.
    pub payments: Vec<AjoPayment>,
}

pub struct GetMemberStatementHandler {
    repository: Arc<dyn AjoRepository>,
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
}

impl GetMemberStatementHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        reader: Arc<dyn AjoReader>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            repository,
            reader,
            directory,
        }
    }

    pub async fn handle(
        &self,
        query: GetMemberStatementQuery,
        metadata: CommandMetadata,
    ) -> Result<MemberStatement, AjoError> {
        let ajo = load_ajo(self.reader.as_ref(), &query.ajo_id).await?;
        let membership = self
            .reader
            .find_member(&ajo.id, &query.member_id)
            .await?
            .ok_or_else(|| AjoError::not_found("Ajo member", query.member_id))?;
        let member = self
            .directory
            .find_by_id(&query.member_id)
            .await?
            .ok_or_else(|| AjoError::not_found("Member", query.member_id))?;

        let settings = self
            .repository
            .find_or_create_settings(&ajo.cooperative_id)
            .await?;
        let payments = self
            .reader
            .member_payments(&ajo.id, &query.member_id)
            .await?;
        let summary = StatementSummary::compute(&ajo, &membership, &settings, payments.len());

        tracing::debug!(
            ajo_id = %ajo.id,
            member_id = %query.member_id,
            requested_by = %metadata.user_id,
            "Member statement computed"
        );

        Ok(MemberStatement {
            ajo,
            member: member.identity(),
            membership,
            summary,
            payments,
        })
    }
}

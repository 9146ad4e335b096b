//! GetAjoHandler - Query handler for one Ajo with roster and payments.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::ajo::{Ajo, AjoError, AjoPayment};
use crate::domain::foundation::{AjoId, CommandMetadata};
use crate::ports::{AjoReader, MemberDirectory};

use super::{join_roster, load_ajo, require_member, RosterEntry};

#[derive(Debug, Clone)]
pub struct GetAjoQuery {
    pub ajo_id: AjoId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjoDetail {
    pub ajo: Ajo,
    pub members: Vec<RosterEntry>,
    /// Newest first.
    pub payments: Vec<AjoPayment>,
}

pub struct GetAjoHandler {
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
}

impl GetAjoHandler {
    pub fn new(reader: Arc<dyn AjoReader>, directory: Arc<dyn MemberDirectory>) -> Self {
        Self { reader, directory }
    }

    pub async fn handle(
        &self,
        query: GetAjoQuery,
        metadata: CommandMetadata,
    ) -> Result<AjoDetail, AjoError> {
        let ajo = load_ajo(self.reader.as_ref(), &query.ajo_id).await?;
        require_member(self.directory.as_ref(), &ajo.cooperative_id, &metadata.user_id).await?;

        let roster = self.reader.roster(&ajo.id).await?;
        let ids: Vec<_> = roster.iter().map(|m| m.member_id).collect();
        let members = self
            .directory
            .find_many_in_cooperative(&ajo.cooperative_id, &ids)
            .await?;
        let payments = self.reader.payments(&ajo.id).await?;

        Ok(AjoDetail {
            members: join_roster(roster, &members),
            payments,
            ajo,
        })
    }
}

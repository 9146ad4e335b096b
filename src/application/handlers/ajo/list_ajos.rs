//! ListAjosHandler - Query handler for a cooperative's Ajos.

use std::sync::Arc;

use crate::domain::ajo::AjoError;
use crate::domain::foundation::{CommandMetadata, CooperativeId};
use crate::ports::{AjoReader, AjoSummary, MemberDirectory};

use super::require_member;

#[derive(Debug, Clone)]
pub struct ListAjosQuery {
    pub cooperative_id: CooperativeId,
}

pub struct ListAjosHandler {
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
}

impl ListAjosHandler {
    pub fn new(reader: Arc<dyn AjoReader>, directory: Arc<dyn MemberDirectory>) -> Self {
        Self { reader, directory }
    }

    /// All Ajos of the cooperative, newest first, each annotated with the
    /// caller's own membership.
    pub async fn handle(
        &self,
        query: ListAjosQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<AjoSummary>, AjoError> {
        let viewer = require_member(
            self.directory.as_ref(),
            &query.cooperative_id,
            &metadata.user_id,
        )
        .await?;

        Ok(self
            .reader
            .list_for_cooperative(&query.cooperative_id, &viewer.id)
            .await?)
    }
}

//! GetSettingsHandler - Query handler for a cooperative's Ajo rates.

use std::sync::Arc;

use crate::domain::ajo::{AjoError, AjoSettings};
use crate::domain::foundation::{CommandMetadata, CooperativeId};
use crate::ports::{AjoRepository, MemberDirectory};

use super::require_member;

#[derive(Debug, Clone)]
pub struct GetSettingsQuery {
    pub cooperative_id: CooperativeId,
}

/// Returns the settings row, creating zero-rate defaults on first access.
pub struct GetSettingsHandler {
    repository: Arc<dyn AjoRepository>,
    directory: Arc<dyn MemberDirectory>,
}

impl GetSettingsHandler {
    pub fn new(repository: Arc<dyn AjoRepository>, directory: Arc<dyn MemberDirectory>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    pub async fn handle(
        &self,
        query: GetSettingsQuery,
        metadata: CommandMetadata,
    ) -> Result<AjoSettings, AjoError> {
        require_member(
            self.directory.as_ref(),
            &query.cooperative_id,
            &metadata.user_id,
        )
        .await?;

        Ok(self
            .repository
            .find_or_create_settings(&query.cooperative_id)
            .await?)
    }
}

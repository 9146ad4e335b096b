//! UpdateAjoHandler - Command handler for partial Ajo updates.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{Ajo, AjoChanges, AjoError};
use crate::domain::foundation::{AjoId, CommandMetadata};
use crate::ports::{ActivityLog, AjoReader, AjoRepository, MemberDirectory};

use super::{load_ajo, record_activity, require_admin};

#[derive(Debug, Clone)]
pub struct UpdateAjoCommand {
    pub ajo_id: AjoId,
    pub changes: AjoChanges,
}

/// Applies a partial update. Only admins of the owning cooperative may
/// update an Ajo.
pub struct UpdateAjoHandler {
    repository: Arc<dyn AjoRepository>,
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
}

impl UpdateAjoHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        reader: Arc<dyn AjoReader>,
        directory: Arc<dyn MemberDirectory>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            repository,
            reader,
            directory,
            activity,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateAjoCommand,
        metadata: CommandMetadata,
    ) -> Result<Ajo, AjoError> {
        let mut ajo = load_ajo(self.reader.as_ref(), &cmd.ajo_id).await?;
        require_admin(self.directory.as_ref(), &ajo.cooperative_id, &metadata.user_id).await?;

        let fields = cmd.changes.touched_fields();
        let expected = ajo.status;
        ajo.apply(cmd.changes)?;
        self.repository.update(&ajo, expected).await?;

        tracing::info!(
            ajo_id = %ajo.id,
            fields = ?fields,
            correlation_id = %metadata.correlation_id(),
            "Ajo updated"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::AJO_UPDATED,
                format!("Updated Ajo \"{}\"", ajo.title),
                Some(ajo.cooperative_id),
                json!({ "ajoId": ajo.id, "fields": fields }),
            ),
        )
        .await;

        Ok(ajo)
    }
}

//! UpdateSettingsHandler - Command handler for changing Ajo rates.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{AjoError, AjoSettings};
use crate::domain::foundation::{CommandMetadata, CooperativeId};
use crate::ports::{ActivityLog, AjoRepository, MemberDirectory};

use super::{record_activity, require_admin};

#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub cooperative_id: CooperativeId,
    pub commission_rate: f64,
    pub interest_rate: f64,
}

pub struct UpdateSettingsHandler {
    repository: Arc<dyn AjoRepository>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
}

impl UpdateSettingsHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        directory: Arc<dyn MemberDirectory>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            repository,
            directory,
            activity,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSettingsCommand,
        metadata: CommandMetadata,
    ) -> Result<AjoSettings, AjoError> {
        require_admin(self.directory.as_ref(), &cmd.cooperative_id, &metadata.user_id).await?;

        let mut settings = self
            .repository
            .find_or_create_settings(&cmd.cooperative_id)
            .await?;
        settings.set_rates(cmd.commission_rate, cmd.interest_rate)?;
        self.repository.save_settings(&settings).await?;

        tracing::info!(
            cooperative_id = %cmd.cooperative_id,
            commission_rate = settings.commission_rate,
            interest_rate = settings.interest_rate,
            correlation_id = %metadata.correlation_id(),
            "Ajo settings updated"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::SETTINGS_UPDATED,
                format!(
                    "Updated Ajo settings: commission {}%, interest {}%",
                    settings.commission_rate, settings.interest_rate
                ),
                Some(cmd.cooperative_id),
                json!({
                    "commissionRate": settings.commission_rate,
                    "interestRate": settings.interest_rate,
                }),
            ),
        )
        .await;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryActivityLog;
    use crate::application::handlers::ajo::test_support::{metadata_for, World};

    fn handler(world: &World) -> UpdateSettingsHandler {
        UpdateSettingsHandler::new(
            world.store.clone(),
            world.directory.clone(),
            world.activity.clone(),
        )
    }

    fn command(world: &World, commission: f64, interest: f64) -> UpdateSettingsCommand {
        UpdateSettingsCommand {
            cooperative_id: world.cooperative_id,
            commission_rate: commission,
            interest_rate: interest,
        }
    }

    #[tokio::test]
    async fn admin_updates_rates_and_logs_activity() {
        let world = World::new();
        let settings = handler(&world)
            .handle(command(&world, 5.0, 2.0), metadata_for(&world.admin))
            .await
            .unwrap();

        assert_eq!(settings.commission_rate, 5.0);
        assert_eq!(settings.interest_rate, 2.0);

        let records = world.activity.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, actions::SETTINGS_UPDATED);
        assert_eq!(records[0].metadata["commissionRate"], 5.0);
    }

    #[tokio::test]
    async fn no_upper_bound_on_rates() {
        let world = World::new();
        let settings = handler(&world)
            .handle(command(&world, 250.0, 0.0), metadata_for(&world.admin))
            .await
            .unwrap();
        assert_eq!(settings.commission_rate, 250.0);
    }

    #[tokio::test]
    async fn negative_rates_are_rejected() {
        let world = World::new();
        let err = handler(&world)
            .handle(command(&world, -1.0, 0.0), metadata_for(&world.admin))
            .await
            .unwrap_err();

        assert!(matches!(err, AjoError::ValidationFailed { ref field, .. } if field == "commissionRate"));
        assert!(world.activity.records().is_empty());
    }

    #[tokio::test]
    async fn plain_members_cannot_update() {
        let world = World::new();
        let err = handler(&world)
            .handle(command(&world, 5.0, 2.0), metadata_for(&world.online))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::Forbidden(_)));
    }

    #[tokio::test]
    async fn activity_failure_does_not_fail_update() {
        let world = World::with_activity_log(InMemoryActivityLog::failing());
        let settings = handler(&world)
            .handle(command(&world, 1.5, 0.5), metadata_for(&world.admin))
            .await
            .unwrap();
        assert_eq!(settings.commission_rate, 1.5);
    }
}

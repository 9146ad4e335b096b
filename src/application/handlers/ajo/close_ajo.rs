//! CloseAjoHandler - Command handler for completing or cancelling an Ajo.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{Ajo, AjoError, AjoStatus, InvitationStatus};
use crate::domain::cooperative::Member;
use crate::domain::foundation::{AjoId, CommandMetadata, DomainError, MemberId};
use crate::ports::{
    ActivityLog, AjoReader, AjoRepository, MemberDirectory, Notification, NotificationKind,
};

use super::{load_ajo, record_activity, require_admin, AjoNotifier, Deliveries};

#[derive(Debug, Clone)]
pub struct CloseAjoCommand {
    pub ajo_id: AjoId,
    /// `Completed` or `Cancelled`.
    pub status: AjoStatus,
}

pub struct CloseAjoHandler {
    repository: Arc<dyn AjoRepository>,
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
    notifier: AjoNotifier,
}

impl CloseAjoHandler {
    pub fn new(
        repository: Arc<dyn AjoRepository>,
        reader: Arc<dyn AjoReader>,
        directory: Arc<dyn MemberDirectory>,
        activity: Arc<dyn ActivityLog>,
        notifier: AjoNotifier,
    ) -> Self {
        Self {
            repository,
            reader,
            directory,
            activity,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: CloseAjoCommand,
        metadata: CommandMetadata,
    ) -> Result<Ajo, AjoError> {
        let mut ajo = load_ajo(self.reader.as_ref(), &cmd.ajo_id).await?;
        require_admin(self.directory.as_ref(), &ajo.cooperative_id, &metadata.user_id).await?;

        let expected = ajo.status;
        ajo.close(cmd.status)?;
        self.repository.update(&ajo, expected).await?;

        tracing::info!(
            ajo_id = %ajo.id,
            status = %ajo.status,
            correlation_id = %metadata.correlation_id(),
            "Ajo closed"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::AJO_CLOSED,
                format!("Marked Ajo \"{}\" as {}", ajo.title, ajo.status),
                Some(ajo.cooperative_id),
                json!({ "ajoId": ajo.id, "status": ajo.status }),
            ),
        )
        .await;

        let members = match self.accepted_members(&ajo).await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(
                    ajo_id = %ajo.id,
                    error = %e,
                    "Failed to load members for close notification"
                );
                return Ok(ajo);
            }
        };

        let mut deliveries = Deliveries::new();
        for member in members.iter().filter(|m| m.is_online()) {
            let Some(user_id) = member.user_id() else {
                continue;
            };
            if user_id == &metadata.user_id {
                continue;
            }
            deliveries.notify(Notification {
                user_id: user_id.clone(),
                kind: NotificationKind::AjoClosed,
                title: format!("Ajo {}", ajo.status),
                body: format!("{} has been marked as {}", ajo.title, ajo.status),
                data: json!({ "ajoId": ajo.id, "status": ajo.status }),
            });
        }
        self.notifier.dispatch(deliveries).await;

        Ok(ajo)
    }

    async fn accepted_members(&self, ajo: &Ajo) -> Result<Vec<Member>, DomainError> {
        let accepted: Vec<MemberId> = self
            .reader
            .roster(&ajo.id)
            .await?
            .into_iter()
            .filter(|m| m.status == InvitationStatus::Accepted)
            .map(|m| m.member_id)
            .collect();
        self.directory
            .find_many_in_cooperative(&ajo.cooperative_id, &accepted)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ajo::test_support::{metadata_for, StoreReader, World};

    fn handler(world: &World) -> CloseAjoHandler {
        CloseAjoHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.directory.clone(),
            world.activity.clone(),
            world.notifier.clone(),
        )
    }

    fn close(ajo: &Ajo, status: AjoStatus) -> CloseAjoCommand {
        CloseAjoCommand {
            ajo_id: ajo.id,
            status,
        }
    }

    #[tokio::test]
    async fn completes_and_notifies_accepted_online_members() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online, &world.offline]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Accepted).await;

        let closed = handler(&world)
            .handle(close(&ajo, AjoStatus::Completed), metadata_for(&world.admin))
            .await
            .unwrap();

        assert_eq!(closed.status, AjoStatus::Completed);
        let stored = world.store.find_ajo(&ajo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AjoStatus::Completed);

        let sent = world.push.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id.as_str(), "ada");
        assert_eq!(sent[0].kind, NotificationKind::AjoClosed);
        assert_eq!(world.activity.actions(), vec![actions::AJO_CLOSED.to_string()]);
    }

    #[tokio::test]
    async fn close_is_kept_when_roster_lookup_fails() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Accepted).await;
        let handler = CloseAjoHandler::new(
            world.store.clone(),
            Arc::new(StoreReader::new(world.store.clone()).with_failing_roster()),
            world.directory.clone(),
            world.activity.clone(),
            world.notifier.clone(),
        );

        let closed = handler
            .handle(close(&ajo, AjoStatus::Completed), metadata_for(&world.admin))
            .await
            .unwrap();

        assert_eq!(closed.status, AjoStatus::Completed);
        let stored = world.store.find_ajo(&ajo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AjoStatus::Completed);
        assert_eq!(world.activity.actions(), vec![actions::AJO_CLOSED.to_string()]);
        assert!(world.push.sent().is_empty());
    }

    #[tokio::test]
    async fn close_is_kept_when_member_lookup_fails() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Accepted).await;
        let handler = CloseAjoHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.failing_directory(),
            world.activity.clone(),
            world.notifier.clone(),
        );

        let closed = handler
            .handle(close(&ajo, AjoStatus::Cancelled), metadata_for(&world.admin))
            .await
            .unwrap();

        assert_eq!(closed.status, AjoStatus::Cancelled);
        let stored = world.store.find_ajo(&ajo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AjoStatus::Cancelled);
        assert!(world.push.sent().is_empty());
    }

    #[tokio::test]
    async fn close_loses_to_a_concurrent_close() {
        let world = World::new();
        let ajo = world.seed_ajo(&[]).await;
        let handler = CloseAjoHandler::new(
            world.store.clone(),
            Arc::new(StoreReader::new(world.store.clone()).closing_after_read(AjoStatus::Cancelled)),
            world.directory.clone(),
            world.activity.clone(),
            world.notifier.clone(),
        );

        let err = handler
            .handle(close(&ajo, AjoStatus::Completed), metadata_for(&world.admin))
            .await
            .unwrap_err();

        assert!(matches!(err, AjoError::BadRequest(_)));
        let stored = world.store.find_ajo(&ajo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AjoStatus::Cancelled);
        assert!(world.activity.actions().is_empty());
    }

    #[tokio::test]
    async fn pending_members_are_not_notified() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;

        handler(&world)
            .handle(close(&ajo, AjoStatus::Cancelled), metadata_for(&world.admin))
            .await
            .unwrap();

        assert!(world.push.sent().is_empty());
    }

    #[tokio::test]
    async fn closing_twice_is_bad_request() {
        let world = World::new();
        let ajo = world.seed_ajo(&[]).await;
        let handler = handler(&world);

        handler
            .handle(close(&ajo, AjoStatus::Cancelled), metadata_for(&world.admin))
            .await
            .unwrap();
        let err = handler
            .handle(close(&ajo, AjoStatus::Completed), metadata_for(&world.admin))
            .await
            .unwrap_err();

        assert!(matches!(err, AjoError::BadRequest(_)));
    }

    #[tokio::test]
    async fn members_cannot_close() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;

        let err = handler(&world)
            .handle(close(&ajo, AjoStatus::Completed), metadata_for(&world.online))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::Forbidden(_)));
    }

    #[tokio::test]
    async fn active_is_not_a_closing_status() {
        let world = World::new();
        let ajo = world.seed_ajo(&[]).await;

        let err = handler(&world)
            .handle(close(&ajo, AjoStatus::Active), metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::ValidationFailed { .. }));
    }
}

//! RecordPaymentHandler - Command handler for recording a contribution.

use std::sync::Arc;

use serde_json::json;

use crate::domain::activity::{actions, ActivityRecord};
use crate::domain::ajo::{Ajo, AjoError, AjoMember, AjoPayment, NewPayment};
use crate::domain::cooperative::Member;
use crate::domain::foundation::{AjoId, CommandMetadata, UserId};
use crate::ports::{
    ActivityLog, AjoReader, AjoRepository, MemberDirectory, Notification, NotificationKind,
};

use super::{load_ajo, record_activity, require_member, templates, AjoNotifier, Deliveries};

#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub ajo_id: AjoId,
    pub payment: NewPayment,
}

#[derive(Debug, Clone)]
pub struct RecordPaymentResult {
    pub payment: AjoPayment,
    /// The payer's membership after the credit.
    pub membership: AjoMember,
}

/// Records a payment against an accepted member of an active Ajo.
///
/// The payment row and the running-total credit are written together by
/// `AjoRepository::record_payment`.
pub struct RecordPaymentHandler {
    repository: Arc<dyn AjoRepository>,
    reader: Arc<dyn AjoReader>,
    directory: Arc<dyn MemberDirectory>,
    activity: Arc<dyn ActivityLog>,
    notifier: AjoNotifier,
}

impl RecordPaymentHandler {
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
        cmd: RecordPaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<RecordPaymentResult, AjoError> {
        let ajo = load_ajo(self.reader.as_ref(), &cmd.ajo_id).await?;
        if !ajo.status.accepts_payments() {
            return Err(AjoError::bad_request(format!(
                "Ajo is {}; payments can only be recorded on an active Ajo",
                ajo.status
            )));
        }
        require_member(self.directory.as_ref(), &ajo.cooperative_id, &metadata.user_id).await?;

        let payer_id = cmd.payment.member_id;
        let membership = self
            .reader
            .find_member(&ajo.id, &payer_id)
            .await?
            .ok_or_else(|| AjoError::not_found("Ajo member", payer_id))?;
        membership.ensure_can_pay()?;

        let payment = AjoPayment::record(ajo.id, metadata.user_id.clone(), cmd.payment)?;
        let membership = self.repository.record_payment(&payment).await?;

        tracing::info!(
            ajo_id = %ajo.id,
            member_id = %payer_id,
            payment_id = %payment.id,
            amount = payment.amount,
            correlation_id = %metadata.correlation_id(),
            "Ajo payment recorded"
        );

        record_activity(
            self.activity.as_ref(),
            ActivityRecord::new(
                metadata.user_id.clone(),
                actions::PAYMENT_RECORDED,
                format!(
                    "Recorded payment of {:.2} for \"{}\"",
                    payment.amount, ajo.title
                ),
                Some(ajo.cooperative_id),
                json!({
                    "ajoId": ajo.id,
                    "memberId": payer_id,
                    "paymentId": payment.id,
                    "amount": payment.amount,
                    "paymentMethod": payment.payment_method,
                }),
            ),
        )
        .await;

        match self.directory.find_by_id(&payer_id).await {
            Ok(Some(payer)) => {
                self.notifier
                    .dispatch(receipt(&ajo, &payer, &payment, &membership, &metadata.user_id))
                    .await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(member_id = %payer_id, error = %e, "Failed to load payer for receipt");
            }
        }

        Ok(RecordPaymentResult {
            payment,
            membership,
        })
    }
}

/// Notifies the payer unless they recorded the payment themselves.
fn receipt(
    ajo: &Ajo,
    payer: &Member,
    payment: &AjoPayment,
    membership: &AjoMember,
    recorded_by: &UserId,
) -> Deliveries {
    let mut deliveries = Deliveries::new();
    if payer.user_id() == Some(recorded_by) {
        return deliveries;
    }

    if let Some(user_id) = payer.user_id() {
        deliveries.notify(Notification {
            user_id: user_id.clone(),
            kind: NotificationKind::AjoPayment,
            title: "Payment recorded".to_string(),
            body: format!("A payment of {:.2} was recorded for {}", payment.amount, ajo.title),
            data: json!({ "ajoId": ajo.id, "paymentId": payment.id }),
        });
    }
    if let Some(email) = payer.email() {
        deliveries.email(templates::payment_recorded(
            email,
            &payer.display_name(),
            ajo,
            payment.amount,
            &payment.payment_method,
            membership.total_paid,
        ));
    }

    deliveries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ajo::test_support::{metadata_for, outsider, World};
    use crate::domain::ajo::{AjoStatus, InvitationStatus};
    use crate::domain::foundation::{MemberId, Timestamp};

    fn handler(world: &World) -> RecordPaymentHandler {
        RecordPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.directory.clone(),
            world.activity.clone(),
            world.notifier.clone(),
        )
    }

    fn pay(ajo: &Ajo, member_id: MemberId, amount: f64) -> RecordPaymentCommand {
        RecordPaymentCommand {
            ajo_id: ajo.id,
            payment: NewPayment {
                member_id,
                amount,
                payment_method: "bank_transfer".to_string(),
                reference_number: Some("TRX-001".to_string()),
                notes: None,
                payment_date: None,
            },
        }
    }

    #[tokio::test]
    async fn credits_member_and_appends_one_payment() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;

        let result = handler(&world)
            .handle(pay(&ajo, world.offline.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap();

        assert_eq!(result.membership.total_paid, 1000.0);
        assert_eq!(world.membership(&ajo, &world.offline).await.total_paid, 1000.0);
        assert_eq!(world.store.payment_count(&ajo.id), 1);
        assert_eq!(result.payment.recorded_by.as_str(), "admin-1");
        assert_eq!(world.activity.actions(), vec![actions::PAYMENT_RECORDED.to_string()]);
    }

    #[tokio::test]
    async fn successive_payments_accumulate() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;
        let handler = handler(&world);

        for amount in [250.0, 500.0, 250.0] {
            handler
                .handle(pay(&ajo, world.offline.id, amount), metadata_for(&world.admin))
                .await
                .unwrap();
        }

        assert_eq!(world.membership(&ajo, &world.offline).await.total_paid, 1000.0);
        assert_eq!(world.store.payment_count(&ajo.id), 3);
    }

    #[tokio::test]
    async fn pending_member_cannot_pay() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;

        let err = handler(&world)
            .handle(pay(&ajo, world.online.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap_err();

        assert!(matches!(err, AjoError::BadRequest(_)));
        assert_eq!(world.store.payment_count(&ajo.id), 0);
        assert_eq!(world.membership(&ajo, &world.online).await.total_paid, 0.0);
    }

    #[tokio::test]
    async fn declined_member_cannot_pay() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Declined).await;

        let err = handler(&world)
            .handle(pay(&ajo, world.online.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::BadRequest(_)));
    }

    #[tokio::test]
    async fn closed_ajo_rejects_payments() {
        let world = World::new();
        let mut ajo = world.seed_ajo(&[&world.offline]).await;
        ajo.close(AjoStatus::Cancelled).unwrap();
        world.store.update(&ajo, AjoStatus::Active).await.unwrap();

        let err = handler(&world)
            .handle(pay(&ajo, world.offline.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::BadRequest(_)));
    }

    #[tokio::test]
    async fn uninvited_member_is_not_found() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;

        let err = handler(&world)
            .handle(pay(&ajo, world.online.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_ajo_is_not_found() {
        let world = World::new();
        let ajo = world.seed_ajo(&[]).await;
        let mut cmd = pay(&ajo, world.offline.id, 1000.0);
        cmd.ajo_id = AjoId::new();

        let err = handler(&world)
            .handle(cmd, metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;

        let err = handler(&world)
            .handle(pay(&ajo, world.offline.id, 0.0), metadata_for(&world.admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::ValidationFailed { .. }));
        assert_eq!(world.store.payment_count(&ajo.id), 0);
    }

    #[tokio::test]
    async fn outsiders_are_forbidden() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;

        let err = handler(&world)
            .handle(pay(&ajo, world.offline.id, 100.0), outsider())
            .await
            .unwrap_err();
        assert!(matches!(err, AjoError::Forbidden(_)));
    }

    #[tokio::test]
    async fn payer_is_notified_when_someone_else_records() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Accepted).await;

        handler(&world)
            .handle(pay(&ajo, world.online.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap();

        let sent = world.push.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id.as_str(), "ada");
        assert_eq!(sent[0].kind, NotificationKind::AjoPayment);
        assert_eq!(world.email.recipients(), vec!["ada@example.com".to_string()]);
    }

    #[tokio::test]
    async fn self_recorded_payment_sends_nothing() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.online]).await;
        world.set_invitation(&ajo, &world.online, InvitationStatus::Accepted).await;

        handler(&world)
            .handle(pay(&ajo, world.online.id, 1000.0), metadata_for(&world.online))
            .await
            .unwrap();

        assert!(world.push.sent().is_empty());
        assert!(world.email.sent().is_empty());
    }

    #[tokio::test]
    async fn offline_payer_gets_email_only() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;

        handler(&world)
            .handle(pay(&ajo, world.offline.id, 1000.0), metadata_for(&world.admin))
            .await
            .unwrap();

        assert!(world.push.sent().is_empty());
        assert_eq!(world.email.recipients(), vec!["bayo@example.com".to_string()]);
    }

    #[tokio::test]
    async fn payment_date_is_kept_when_given() {
        let world = World::new();
        let ajo = world.seed_ajo(&[&world.offline]).await;
        let mut cmd = pay(&ajo, world.offline.id, 1000.0);
        let date = Timestamp::parse("paymentDate", "2026-01-05").unwrap();
        cmd.payment.payment_date = Some(date);

        let result = handler(&world)
            .handle(cmd, metadata_for(&world.admin))
            .await
            .unwrap();
        assert_eq!(result.payment.payment_date, date);
    }
}

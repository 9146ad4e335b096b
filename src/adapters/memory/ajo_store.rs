//! In-memory Ajo store implementing both `AjoRepository` and `AjoReader`.
//!
//! Everything lives behind one `RwLock`, so multi-row writes (create with
//! members, payment plus credit) are atomic the same way a database
//! transaction is.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment, AjoSettings, AjoStatus, InvitationStatus};
use crate::domain::foundation::{AjoId, CooperativeId, DomainError, ErrorCode, MemberId};
use crate::ports::{AjoReader, AjoRepository, AjoSummary, PendingInvitation};

#[derive(Debug, Default)]
struct State {
    settings: HashMap<CooperativeId, AjoSettings>,
    ajos: Vec<Ajo>,
    members: Vec<AjoMember>,
    payments: Vec<AjoPayment>,
}

impl State {
    fn member_count(&self, ajo_id: &AjoId) -> u64 {
        self.members.iter().filter(|m| &m.ajo_id == ajo_id).count() as u64
    }

    fn payment_count(&self, ajo_id: &AjoId) -> u64 {
        self.payments.iter().filter(|p| &p.ajo_id == ajo_id).count() as u64
    }
}

/// Ajo persistence held in process memory.
///
/// Used by handler tests and by local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryAjoStore {
    state: RwLock<State>,
}

impl InMemoryAjoStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Number of payments stored for an Ajo.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn payment_count(&self, ajo_id: &AjoId) -> usize {
        self.state
            .read()
            .expect("InMemoryAjoStore: state lock poisoned")
            .payment_count(ajo_id) as usize
    }

    /// Number of Ajos stored across all cooperatives.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn ajo_count(&self) -> usize {
        self.state
            .read()
            .expect("InMemoryAjoStore: state lock poisoned")
            .ajos
            .len()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "ajo store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "ajo store lock poisoned"))
    }
}

fn not_found(what: &str, id: impl ToString) -> DomainError {
    DomainError::new(ErrorCode::NotFound, format!("{} not found", what))
        .with_detail("id", id.to_string())
}

fn status_changed(ajo: &Ajo, current: AjoStatus) -> DomainError {
    DomainError::new(ErrorCode::BadRequest, "Ajo was changed by another request")
        .with_detail("id", ajo.id.to_string())
        .with_detail("status", current.to_string())
}

#[async_trait]
impl AjoRepository for InMemoryAjoStore {
    async fn find_or_create_settings(
        &self,
        cooperative_id: &CooperativeId,
    ) -> Result<AjoSettings, DomainError> {
        let mut state = self.write()?;
        Ok(state
            .settings
            .entry(*cooperative_id)
            .or_insert_with(|| AjoSettings::defaults_for(*cooperative_id))
            .clone())
    }

    async fn save_settings(&self, settings: &AjoSettings) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let created_at = state
            .settings
            .get(&settings.cooperative_id)
            .map(|existing| existing.created_at)
            .unwrap_or(settings.created_at);
        let mut stored = settings.clone();
        stored.created_at = created_at;
        state.settings.insert(settings.cooperative_id, stored);
        Ok(())
    }

    async fn create(&self, ajo: &Ajo, members: &[AjoMember]) -> Result<(), DomainError> {
        let mut state = self.write()?;
        if state.ajos.iter().any(|a| a.id == ajo.id) {
            return Err(DomainError::database("duplicate ajo id").with_detail("id", ajo.id.to_string()));
        }
        state.ajos.push(ajo.clone());
        state.members.extend(members.iter().cloned());
        Ok(())
    }

    async fn update(&self, ajo: &Ajo, expected_status: AjoStatus) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let slot = state
            .ajos
            .iter_mut()
            .find(|a| a.id == ajo.id)
            .ok_or_else(|| not_found("Ajo", ajo.id))?;
        if slot.status != expected_status {
            return Err(status_changed(ajo, slot.status));
        }
        *slot = ajo.clone();
        Ok(())
    }

    async fn update_member(&self, member: &AjoMember) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let slot = state
            .members
            .iter_mut()
            .find(|m| m.ajo_id == member.ajo_id && m.member_id == member.member_id)
            .ok_or_else(|| not_found("Ajo member", member.member_id))?;
        slot.status = member.status;
        slot.responded_at = member.responded_at;
        Ok(())
    }

    async fn record_payment(&self, payment: &AjoPayment) -> Result<AjoMember, DomainError> {
        let mut state = self.write()?;
        let member = state
            .members
            .iter_mut()
            .find(|m| m.ajo_id == payment.ajo_id && m.member_id == payment.member_id)
            .ok_or_else(|| not_found("Ajo member", payment.member_id))?;
        member.credit(payment.amount);
        let updated = member.clone();
        state.payments.push(payment.clone());
        Ok(updated)
    }
}

#[async_trait]
impl AjoReader for InMemoryAjoStore {
    async fn find_ajo(&self, id: &AjoId) -> Result<Option<Ajo>, DomainError> {
        Ok(self.read()?.ajos.iter().find(|a| &a.id == id).cloned())
    }

    async fn find_member(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Option<AjoMember>, DomainError> {
        Ok(self
            .read()?
            .members
            .iter()
            .find(|m| &m.ajo_id == ajo_id && &m.member_id == member_id)
            .cloned())
    }

    async fn list_for_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        viewer: &MemberId,
    ) -> Result<Vec<AjoSummary>, DomainError> {
        let state = self.read()?;
        // Reverse insertion order first so equal timestamps stay newest first.
        let mut ajos: Vec<&Ajo> = state
            .ajos
            .iter()
            .rev()
            .filter(|a| &a.cooperative_id == cooperative_id)
            .collect();
        ajos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(ajos
            .into_iter()
            .map(|ajo| AjoSummary {
                ajo: ajo.clone(),
                my_membership: state
                    .members
                    .iter()
                    .find(|m| m.ajo_id == ajo.id && &m.member_id == viewer)
                    .cloned(),
                member_count: state.member_count(&ajo.id),
                payment_count: state.payment_count(&ajo.id),
            })
            .collect())
    }

    async fn roster(&self, ajo_id: &AjoId) -> Result<Vec<AjoMember>, DomainError> {
        Ok(self
            .read()?
            .members
            .iter()
            .filter(|m| &m.ajo_id == ajo_id)
            .cloned()
            .collect())
    }

    async fn payments(&self, ajo_id: &AjoId) -> Result<Vec<AjoPayment>, DomainError> {
        let state = self.read()?;
        let mut payments: Vec<AjoPayment> = state
            .payments
            .iter()
            .rev()
            .filter(|p| &p.ajo_id == ajo_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(payments)
    }

    async fn member_payments(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Vec<AjoPayment>, DomainError> {
        let state = self.read()?;
        let mut payments: Vec<AjoPayment> = state
            .payments
            .iter()
            .filter(|p| &p.ajo_id == ajo_id && &p.member_id == member_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        Ok(payments)
    }

    async fn pending_invitations(
        &self,
        member_ids: &[MemberId],
    ) -> Result<Vec<PendingInvitation>, DomainError> {
        let state = self.read()?;
        let mut invitations: Vec<PendingInvitation> = state
            .members
            .iter()
            .rev()
            .filter(|m| m.status == InvitationStatus::Pending && member_ids.contains(&m.member_id))
            .filter_map(|m| {
                let ajo = state.ajos.iter().find(|a| a.id == m.ajo_id)?;
                Some(PendingInvitation {
                    invitation: m.clone(),
                    ajo: ajo.clone(),
                    member_count: state.member_count(&ajo.id),
                })
            })
            .collect();
        invitations.sort_by(|a, b| b.invitation.invited_at.cmp(&a.invitation.invited_at));
        Ok(invitations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ajo::aggregate::test_support::new_ajo_input;
    use crate::domain::ajo::NewPayment;
    use crate::domain::foundation::{Timestamp, UserId};

    fn ajo(coop: CooperativeId) -> Ajo {
        Ajo::create(new_ajo_input(coop)).unwrap()
    }

    fn membership(ajo: &Ajo, status: InvitationStatus) -> AjoMember {
        AjoMember {
            ajo_id: ajo.id,
            member_id: MemberId::new(),
            status,
            total_paid: 0.0,
            invited_at: Timestamp::now(),
            responded_at: None,
        }
    }

    fn payment(ajo: &Ajo, member: &AjoMember, amount: f64, date: &str) -> AjoPayment {
        AjoPayment::record(
            ajo.id,
            UserId::new("admin-1").unwrap(),
            NewPayment {
                member_id: member.member_id,
                amount,
                payment_method: "cash".to_string(),
                reference_number: None,
                notes: None,
                payment_date: Some(Timestamp::parse("paymentDate", date).unwrap()),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn settings_are_created_once() {
        let store = InMemoryAjoStore::new();
        let coop = CooperativeId::new();

        let first = store.find_or_create_settings(&coop).await.unwrap();
        let mut changed = first.clone();
        changed.set_rates(3.0, 1.0).unwrap();
        store.save_settings(&changed).await.unwrap();

        let again = store.find_or_create_settings(&coop).await.unwrap();
        assert_eq!(again.commission_rate, 3.0);
        assert_eq!(again.created_at, first.created_at);
    }

    #[tokio::test]
    async fn record_payment_credits_member() {
        let store = InMemoryAjoStore::new();
        let ajo = ajo(CooperativeId::new());
        let member = membership(&ajo, InvitationStatus::Accepted);
        store.create(&ajo, &[member.clone()]).await.unwrap();

        let updated = store
            .record_payment(&payment(&ajo, &member, 250.0, "2026-01-02"))
            .await
            .unwrap();

        assert_eq!(updated.total_paid, 250.0);
        assert_eq!(store.payment_count(&ajo.id), 1);
    }

    #[tokio::test]
    async fn record_payment_for_unknown_member_writes_nothing() {
        let store = InMemoryAjoStore::new();
        let ajo = ajo(CooperativeId::new());
        store.create(&ajo, &[]).await.unwrap();
        let stranger = membership(&ajo, InvitationStatus::Accepted);

        let err = store
            .record_payment(&payment(&ajo, &stranger, 250.0, "2026-01-02"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(store.payment_count(&ajo.id), 0);
    }

    #[tokio::test]
    async fn payment_orderings() {
        let store = InMemoryAjoStore::new();
        let ajo = ajo(CooperativeId::new());
        let member = membership(&ajo, InvitationStatus::Accepted);
        store.create(&ajo, &[member.clone()]).await.unwrap();
        for date in ["2026-01-08", "2026-01-01", "2026-01-15"] {
            store
                .record_payment(&payment(&ajo, &member, 100.0, date))
                .await
                .unwrap();
        }

        let newest_first: Vec<String> = store
            .payments(&ajo.id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.payment_date.as_datetime().format("%d").to_string())
            .collect();
        assert_eq!(newest_first, vec!["15", "08", "01"]);

        let oldest_first: Vec<String> = store
            .member_payments(&ajo.id, &member.member_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.payment_date.as_datetime().format("%d").to_string())
            .collect();
        assert_eq!(oldest_first, vec!["01", "08", "15"]);
    }

    #[tokio::test]
    async fn list_annotates_viewer_membership_and_counts() {
        let store = InMemoryAjoStore::new();
        let coop = CooperativeId::new();
        let older = ajo(coop);
        let newer = ajo(coop);
        let viewer = membership(&newer, InvitationStatus::Pending);
        let other = membership(&newer, InvitationStatus::Accepted);
        store.create(&older, &[]).await.unwrap();
        store.create(&newer, &[viewer.clone(), other]).await.unwrap();
        store.create(&ajo(CooperativeId::new()), &[]).await.unwrap();

        let list = store
            .list_for_cooperative(&coop, &viewer.member_id)
            .await
            .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ajo.id, newer.id);
        assert_eq!(list[0].member_count, 2);
        assert_eq!(list[0].my_membership.as_ref().map(|m| m.member_id), Some(viewer.member_id));
        assert!(list[1].my_membership.is_none());
    }

    #[tokio::test]
    async fn pending_invitations_skip_answered_rows() {
        let store = InMemoryAjoStore::new();
        let ajo = ajo(CooperativeId::new());
        let pending = membership(&ajo, InvitationStatus::Pending);
        let mut answered = membership(&ajo, InvitationStatus::Pending);
        answered.status = InvitationStatus::Declined;
        store.create(&ajo, &[pending.clone(), answered.clone()]).await.unwrap();

        let found = store
            .pending_invitations(&[pending.member_id, answered.member_id])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].invitation.member_id, pending.member_id);
        assert_eq!(found[0].member_count, 2);
    }

    #[tokio::test]
    async fn update_unknown_ajo_is_not_found() {
        let store = InMemoryAjoStore::new();
        let err = store
            .update(&ajo(CooperativeId::new()), AjoStatus::Active)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_refuses_a_stale_status() {
        let store = InMemoryAjoStore::new();
        let original = ajo(CooperativeId::new());
        store.create(&original, &[]).await.unwrap();

        let mut cancelled = original.clone();
        cancelled.status = AjoStatus::Cancelled;
        store.update(&cancelled, AjoStatus::Active).await.unwrap();

        let mut renamed = original.clone();
        renamed.title = "Renamed".to_string();
        let err = store.update(&renamed, AjoStatus::Active).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::BadRequest);
        let stored = store.find_ajo(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AjoStatus::Cancelled);
        assert_eq!(stored.title, original.title);
    }
}

//! Shared fixtures for the Ajo handler tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::memory::{
    InMemoryActivityLog, InMemoryAjoStore, InMemoryMemberDirectory, RecordingEmailSender,
    RecordingNotificationSender,
};
use crate::domain::ajo::aggregate::test_support::new_ajo_input;
use crate::domain::ajo::{Ajo, AjoMember, AjoPayment, AjoStatus, InvitationStatus};
use crate::domain::cooperative::{LinkedUser, Member, MemberRole, OfflineContact};
use crate::domain::foundation::{
    AjoId, CommandMetadata, CooperativeId, DomainError, MemberId, Timestamp, UserId,
};
use crate::ports::{AjoReader, AjoRepository, AjoSummary, PendingInvitation};

use super::{AjoNotifier, DeliveryMode};

pub fn online_member(
    cooperative_id: CooperativeId,
    user_id: &str,
    email: Option<&str>,
    role: MemberRole,
) -> Member {
    Member {
        id: MemberId::new(),
        cooperative_id,
        role,
        user: Some(LinkedUser {
            id: UserId::new(user_id).unwrap(),
            first_name: user_id.to_string(),
            last_name: "Test".to_string(),
            email: email.map(str::to_string),
            phone: None,
        }),
        offline: OfflineContact::default(),
        is_offline_member: false,
    }
}

pub fn offline_member(cooperative_id: CooperativeId, email: Option<&str>) -> Member {
    Member {
        id: MemberId::new(),
        cooperative_id,
        role: MemberRole::Member,
        user: None,
        offline: OfflineContact {
            first_name: Some("Bayo".to_string()),
            last_name: Some("Ade".to_string()),
            email: email.map(str::to_string),
            phone: Some("+2348000000000".to_string()),
        },
        is_offline_member: true,
    }
}

pub fn metadata_for(member: &Member) -> CommandMetadata {
    CommandMetadata::new(member.user_id().cloned().unwrap())
}

pub fn outsider() -> CommandMetadata {
    CommandMetadata::new(UserId::new("outsider").unwrap())
}

/// A cooperative with one admin, one online member and one offline member,
/// wired to in-memory adapters with inline delivery.
pub struct World {
    pub store: Arc<InMemoryAjoStore>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub activity: Arc<InMemoryActivityLog>,
    pub push: Arc<RecordingNotificationSender>,
    pub email: Arc<RecordingEmailSender>,
    pub notifier: AjoNotifier,
    pub cooperative_id: CooperativeId,
    pub admin: Member,
    pub online: Member,
    pub offline: Member,
}

impl World {
    pub fn new() -> Self {
        Self::with_activity_log(InMemoryActivityLog::new())
    }

    pub fn with_activity_log(activity: InMemoryActivityLog) -> Self {
        let cooperative_id = CooperativeId::new();
        let admin = online_member(
            cooperative_id,
            "admin-1",
            Some("admin@example.com"),
            MemberRole::Admin,
        );
        let online = online_member(
            cooperative_id,
            "ada",
            Some("ada@example.com"),
            MemberRole::Member,
        );
        let offline = offline_member(cooperative_id, Some("bayo@example.com"));

        let directory = InMemoryMemberDirectory::new()
            .with_member(admin.clone())
            .with_member(online.clone())
            .with_member(offline.clone());

        let push = Arc::new(RecordingNotificationSender::new());
        let email = Arc::new(RecordingEmailSender::new());
        let notifier = AjoNotifier::new(push.clone(), email.clone(), DeliveryMode::Inline);

        Self {
            store: Arc::new(InMemoryAjoStore::new()),
            directory: Arc::new(directory),
            activity: Arc::new(activity),
            push,
            email,
            notifier,
            cooperative_id,
            admin,
            online,
            offline,
        }
    }

    /// Stores an Ajo with the given members invited, bypassing the handler.
    pub async fn seed_ajo(&self, members: &[&Member]) -> Ajo {
        let ajo = Ajo::create(new_ajo_input(self.cooperative_id)).unwrap();
        let rows: Vec<AjoMember> = members
            .iter()
            .map(|m| AjoMember::invite(ajo.id, m, Timestamp::now()))
            .collect();
        self.store.create(&ajo, &rows).await.unwrap();
        ajo
    }

    /// The same three members, behind a directory whose bulk lookups fail.
    pub fn failing_directory(&self) -> Arc<InMemoryMemberDirectory> {
        Arc::new(
            InMemoryMemberDirectory::new()
                .with_member(self.admin.clone())
                .with_member(self.online.clone())
                .with_member(self.offline.clone())
                .with_failing_bulk_lookups(),
        )
    }

    pub async fn set_invitation(&self, ajo: &Ajo, member: &Member, status: InvitationStatus) {
        let mut row = self
            .store
            .find_member(&ajo.id, &member.id)
            .await
            .unwrap()
            .unwrap();
        row.status = status;
        row.responded_at = Some(Timestamp::now());
        self.store.update_member(&row).await.unwrap();
    }

    pub async fn membership(&self, ajo: &Ajo, member: &Member) -> AjoMember {
        self.store
            .find_member(&ajo.id, &member.id)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Reads through to an `InMemoryAjoStore`, with switches for failure and
/// for a competing writer that closes the Ajo right after it is read.
pub struct StoreReader {
    store: Arc<InMemoryAjoStore>,
    fail_roster: bool,
    close_after_read: Option<AjoStatus>,
}

impl StoreReader {
    pub fn new(store: Arc<InMemoryAjoStore>) -> Self {
        Self {
            store,
            fail_roster: false,
            close_after_read: None,
        }
    }

    pub fn with_failing_roster(mut self) -> Self {
        self.fail_roster = true;
        self
    }

    pub fn closing_after_read(mut self, status: AjoStatus) -> Self {
        self.close_after_read = Some(status);
        self
    }
}

#[async_trait]
impl AjoReader for StoreReader {
    async fn find_ajo(&self, id: &AjoId) -> Result<Option<Ajo>, DomainError> {
        let found = self.store.find_ajo(id).await?;
        if let (Some(ajo), Some(status)) = (&found, self.close_after_read) {
            let mut closed = ajo.clone();
            closed.status = status;
            self.store.update(&closed, ajo.status).await?;
        }
        Ok(found)
    }

    async fn find_member(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Option<AjoMember>, DomainError> {
        self.store.find_member(ajo_id, member_id).await
    }

    async fn list_for_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        viewer: &MemberId,
    ) -> Result<Vec<AjoSummary>, DomainError> {
        self.store.list_for_cooperative(cooperative_id, viewer).await
    }

    async fn roster(&self, ajo_id: &AjoId) -> Result<Vec<AjoMember>, DomainError> {
        if self.fail_roster {
            return Err(DomainError::database("roster unavailable"));
        }
        self.store.roster(ajo_id).await
    }

    async fn payments(&self, ajo_id: &AjoId) -> Result<Vec<AjoPayment>, DomainError> {
        self.store.payments(ajo_id).await
    }

    async fn member_payments(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Vec<AjoPayment>, DomainError> {
        self.store.member_payments(ajo_id, member_id).await
    }

    async fn pending_invitations(
        &self,
        member_ids: &[MemberId],
    ) -> Result<Vec<PendingInvitation>, DomainError> {
        self.store.pending_invitations(member_ids).await
    }
}

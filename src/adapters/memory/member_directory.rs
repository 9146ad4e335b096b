//! In-memory cooperative member directory.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::cooperative::Member;
use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode, MemberId, UserId};
use crate::ports::MemberDirectory;

#[derive(Debug, Default)]
pub struct InMemoryMemberDirectory {
    members: RwLock<Vec<Member>>,
    fail_bulk_lookups: bool,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn with_member(self, member: Member) -> Self {
        self.add(member);
        self
    }

    /// Makes `find_many_in_cooperative` and `find_admins` fail, leaving
    /// single-member lookups working.
    pub fn with_failing_bulk_lookups(mut self) -> Self {
        self.fail_bulk_lookups = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add(&self, member: Member) {
        self.members
            .write()
            .expect("InMemoryMemberDirectory: lock poisoned")
            .push(member);
    }

    fn matching<F>(&self, predicate: F) -> Result<Vec<Member>, DomainError>
    where
        F: Fn(&Member) -> bool,
    {
        let members = self
            .members
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "member directory lock poisoned"))?;
        Ok(members.iter().filter(|m| predicate(m)).cloned().collect())
    }

    fn bulk_available(&self) -> Result<(), DomainError> {
        if self.fail_bulk_lookups {
            return Err(DomainError::database("member directory unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self.matching(|m| &m.id == id)?.into_iter().next())
    }

    async fn find_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        user_id: &UserId,
    ) -> Result<Option<Member>, DomainError> {
        Ok(self
            .matching(|m| &m.cooperative_id == cooperative_id && m.user_id() == Some(user_id))?
            .into_iter()
            .next())
    }

    async fn find_many_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        ids: &[MemberId],
    ) -> Result<Vec<Member>, DomainError> {
        self.bulk_available()?;
        self.matching(|m| &m.cooperative_id == cooperative_id && ids.contains(&m.id))
    }

    async fn find_all_for_user(&self, user_id: &UserId) -> Result<Vec<Member>, DomainError> {
        self.matching(|m| m.user_id() == Some(user_id))
    }

    async fn find_admins(&self, cooperative_id: &CooperativeId) -> Result<Vec<Member>, DomainError> {
        self.bulk_available()?;
        self.matching(|m| &m.cooperative_id == cooperative_id && m.is_admin())
    }
}

//! Member directory port.
//!
//! Read-only access to the cooperative module's member records. The Ajo
//! workflows use it for membership checks, admin lookup and to resolve
//! contact details for notifications.

use crate::domain::cooperative::Member;
use crate::domain::foundation::{CooperativeId, DomainError, MemberId, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Find a member by id, in any cooperative.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// The caller's member record in one cooperative, if they belong to it.
    async fn find_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        user_id: &UserId,
    ) -> Result<Option<Member>, DomainError>;

    /// Those of `ids` that belong to the cooperative. Unknown ids and
    /// members of other cooperatives are silently left out.
    async fn find_many_in_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        ids: &[MemberId],
    ) -> Result<Vec<Member>, DomainError>;

    /// Every member record linked to the user, across cooperatives.
    async fn find_all_for_user(&self, user_id: &UserId) -> Result<Vec<Member>, DomainError>;

    /// Admins of a cooperative.
    async fn find_admins(&self, cooperative_id: &CooperativeId) -> Result<Vec<Member>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn MemberDirectory) {}
    }
}

//! Ajo reader port (read side / queries).
//!
//! Read-optimized views for listing and detail screens. Ordering is part of
//! the contract: lists of Ajos and invitations are newest first, an Ajo's
//! payment history is newest first, and one member's payments (statement)
//! are oldest first.

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment};
use crate::domain::foundation::{AjoId, CooperativeId, DomainError, MemberId};
use async_trait::async_trait;
use serde::Serialize;

/// Reader port for Ajo queries.
#[async_trait]
pub trait AjoReader: Send + Sync {
    /// Find an Ajo by id. Returns `None` if not found.
    async fn find_ajo(&self, id: &AjoId) -> Result<Option<Ajo>, DomainError>;

    /// Find one membership row. Returns `None` if the member was never invited.
    async fn find_member(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Option<AjoMember>, DomainError>;

    /// All Ajos of a cooperative, newest first, each with the viewer's own
    /// membership (if any) and member/payment counts.
    async fn list_for_cooperative(
        &self,
        cooperative_id: &CooperativeId,
        viewer: &MemberId,
    ) -> Result<Vec<AjoSummary>, DomainError>;

    /// Every membership row of an Ajo, in invitation order.
    async fn roster(&self, ajo_id: &AjoId) -> Result<Vec<AjoMember>, DomainError>;

    /// Every payment of an Ajo, newest first.
    async fn payments(&self, ajo_id: &AjoId) -> Result<Vec<AjoPayment>, DomainError>;

    /// One member's payments in an Ajo, oldest first.
    async fn member_payments(
        &self,
        ajo_id: &AjoId,
        member_id: &MemberId,
    ) -> Result<Vec<AjoPayment>, DomainError>;

    /// Pending invitations addressed to any of `member_ids`, most recently
    /// invited first, with the parent Ajo and its member count.
    async fn pending_invitations(
        &self,
        member_ids: &[MemberId],
    ) -> Result<Vec<PendingInvitation>, DomainError>;
}

/// One row of the cooperative's Ajo list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjoSummary {
    pub ajo: Ajo,
    pub my_membership: Option<AjoMember>,
    pub member_count: u64,
    pub payment_count: u64,
}

/// An invitation awaiting the member's answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingInvitation {
    pub invitation: AjoMember,
    pub ajo: Ajo,
    pub member_count: u64,
}

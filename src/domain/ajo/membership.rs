//! Ajo membership: one invited member's standing in one Ajo.

use serde::{Deserialize, Serialize};

use crate::domain::cooperative::Member;
use crate::domain::foundation::{AjoId, MemberId, StateMachine, Timestamp};

use super::{AjoError, InvitationStatus};

/// Invitation status and running contribution total of a member in an Ajo.
///
/// `(ajo_id, member_id)` is unique. `total_paid` only ever grows, by the
/// amount of each recorded payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AjoMember {
    pub ajo_id: AjoId,
    pub member_id: MemberId,
    pub status: InvitationStatus,
    pub total_paid: f64,
    pub invited_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

impl AjoMember {
    /// Invites a member. Members who cannot answer in-app (no linked
    /// account, or flagged offline) are accepted on the spot.
    pub fn invite(ajo_id: AjoId, member: &Member, now: Timestamp) -> Self {
        let (status, responded_at) = if member.is_online() {
            (InvitationStatus::Pending, None)
        } else {
            (InvitationStatus::Accepted, Some(now))
        };
        Self {
            ajo_id,
            member_id: member.id,
            status,
            total_paid: 0.0,
            invited_at: now,
            responded_at,
        }
    }

    /// Records the member's answer.
    ///
    /// Repeating the same answer is accepted and refreshes `responded_at`;
    /// switching between accepted and declined is not.
    pub fn respond(&mut self, answer: InvitationStatus, now: Timestamp) -> Result<(), AjoError> {
        if !answer.is_answer() {
            return Err(AjoError::validation(
                "status",
                "an invitation can only be accepted or declined",
            ));
        }
        let current = self.status;
        if answer != current {
            self.status = current.transition_to(answer).map_err(|_| {
                AjoError::bad_request(format!("Invitation has already been {}", current))
            })?;
        }
        self.responded_at = Some(now);
        Ok(())
    }

    /// Fails unless the member has accepted the invitation.
    pub fn ensure_can_pay(&self) -> Result<(), AjoError> {
        if self.status != InvitationStatus::Accepted {
            return Err(AjoError::bad_request(format!(
                "Member has not accepted this Ajo (status: {})",
                self.status
            )));
        }
        Ok(())
    }

    /// Adds a payment to the running total.
    pub fn credit(&mut self, amount: f64) {
        self.total_paid += amount;
    }
}

//! Ajo command and query handlers.
//!
//! Every handler checks cooperative membership through `MemberDirectory`
//! before touching Ajo data. Audit records and notifications are written
//! after the primary change is committed and never fail the request.

mod close_ajo;
mod create_ajo;
mod get_ajo;
mod get_member_statement;
mod get_settings;
mod list_ajos;
mod list_pending_invitations;
mod notifier;
mod record_payment;
mod respond_to_invitation;
pub mod templates;
mod update_ajo;
mod update_settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use close_ajo::{CloseAjoCommand, CloseAjoHandler};
pub use create_ajo::{CreateAjoCommand, CreateAjoHandler, CreateAjoResult};
pub use get_ajo::{AjoDetail, GetAjoHandler, GetAjoQuery};
pub use get_member_statement::{GetMemberStatementHandler, GetMemberStatementQuery, MemberStatement};
pub use get_settings::{GetSettingsHandler, GetSettingsQuery};
pub use list_ajos::{ListAjosHandler, ListAjosQuery};
pub use list_pending_invitations::ListPendingInvitationsHandler;
pub use notifier::{AjoNotifier, Deliveries, DeliveryMode};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult};
pub use respond_to_invitation::{RespondToInvitationCommand, RespondToInvitationHandler};
pub use update_ajo::{UpdateAjoCommand, UpdateAjoHandler};
pub use update_settings::{UpdateSettingsCommand, UpdateSettingsHandler};

use serde::Serialize;

use crate::domain::activity::ActivityRecord;
use crate::domain::ajo::{Ajo, AjoError, AjoMember};
use crate::domain::cooperative::{Member, MemberIdentity};
use crate::domain::foundation::{AjoId, CooperativeId, UserId};
use crate::ports::{ActivityLog, AjoReader, MemberDirectory};

/// One roster row: the membership joined with who the member is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub membership: AjoMember,
    pub identity: MemberIdentity,
}

async fn load_ajo(reader: &dyn AjoReader, ajo_id: &AjoId) -> Result<Ajo, AjoError> {
    reader
        .find_ajo(ajo_id)
        .await?
        .ok_or_else(|| AjoError::not_found("Ajo", ajo_id))
}

/// The caller's member record in the cooperative, or `Forbidden`.
async fn require_member(
    directory: &dyn MemberDirectory,
    cooperative_id: &CooperativeId,
    user_id: &UserId,
) -> Result<Member, AjoError> {
    directory
        .find_in_cooperative(cooperative_id, user_id)
        .await?
        .ok_or_else(|| AjoError::forbidden("You are not a member of this cooperative"))
}

/// Like `require_member`, and the member must be an admin.
async fn require_admin(
    directory: &dyn MemberDirectory,
    cooperative_id: &CooperativeId,
    user_id: &UserId,
) -> Result<Member, AjoError> {
    let member = require_member(directory, cooperative_id, user_id).await?;
    if !member.is_admin() {
        return Err(AjoError::forbidden(
            "Only cooperative admins can perform this action",
        ));
    }
    Ok(member)
}

/// Appends an audit record. A failure is logged and otherwise ignored.
async fn record_activity(log: &dyn ActivityLog, record: ActivityRecord) {
    let action = record.action.clone();
    if let Err(e) = log.record(record).await {
        tracing::warn!(action = %action, error = %e, "Failed to write activity log");
    }
}

/// Joins memberships with member identities, keeping roster order.
fn join_roster(memberships: Vec<AjoMember>, members: &[Member]) -> Vec<RosterEntry> {
    memberships
        .into_iter()
        .filter_map(|membership| {
            let identity = members
                .iter()
                .find(|m| m.id == membership.member_id)
                .map(Member::identity);
            if identity.is_none() {
                tracing::warn!(
                    ajo_id = %membership.ajo_id,
                    member_id = %membership.member_id,
                    "Ajo member has no cooperative member record"
                );
            }
            identity.map(|identity| RosterEntry {
                membership,
                identity,
            })
        })
        .collect()
}

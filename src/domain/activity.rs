//! Audit records.
//!
//! Every Ajo mutation appends one immutable record naming the actor, the
//! action, a human-readable description and structured metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{CooperativeId, Timestamp, UserId};

/// Action names written to the activity log.
pub mod actions {
    pub const SETTINGS_UPDATED: &str = "ajo.settings_updated";
    pub const AJO_CREATED: &str = "ajo.created";
    pub const AJO_UPDATED: &str = "ajo.updated";
    pub const AJO_CLOSED: &str = "ajo.closed";
    pub const INVITATION_RESPONDED: &str = "ajo.invitation_responded";
    pub const PAYMENT_RECORDED: &str = "ajo.payment_recorded";
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub actor: UserId,
    pub action: String,
    pub description: String,
    pub cooperative_id: Option<CooperativeId>,
    pub metadata: Value,
    pub created_at: Timestamp,
}

impl ActivityRecord {
    pub fn new(
        actor: UserId,
        action: &str,
        description: impl Into<String>,
        cooperative_id: Option<CooperativeId>,
        metadata: Value,
    ) -> Self {
        Self {
            actor,
            action: action.to_string(),
            description: description.into(),
            cooperative_id,
            metadata,
            created_at: Timestamp::now(),
        }
    }
}

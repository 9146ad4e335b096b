//! Lifecycle statuses for an Ajo and for each invited member.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle status of an Ajo.
///
/// Nothing moves an Ajo out of `Active` automatically; reaching the end
/// date leaves it active until an admin closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AjoStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl AjoStatus {
    /// Payments can only be recorded against an active Ajo.
    pub fn accepts_payments(&self) -> bool {
        matches!(self, AjoStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AjoStatus::Active => "active",
            AjoStatus::Completed => "completed",
            AjoStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for AjoStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AjoStatus::*;
        matches!((self, target), (Active, Completed) | (Active, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            AjoStatus::Active => vec![AjoStatus::Completed, AjoStatus::Cancelled],
            AjoStatus::Completed | AjoStatus::Cancelled => vec![],
        }
    }
}

impl fmt::Display for AjoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AjoStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AjoStatus::Active),
            "completed" => Ok(AjoStatus::Completed),
            "cancelled" => Ok(AjoStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown ajo status '{}'", other),
            )),
        }
    }
}

/// Invitation status of one member in one Ajo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
        }
    }

    /// Whether a member may answer with this status.
    pub fn is_answer(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

impl StateMachine for InvitationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvitationStatus::*;
        matches!((self, target), (Pending, Accepted) | (Pending, Declined))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            InvitationStatus::Pending => {
                vec![InvitationStatus::Accepted, InvitationStatus::Declined]
            }
            InvitationStatus::Accepted | InvitationStatus::Declined => vec![],
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown invitation status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_can_complete_or_cancel() {
        assert!(AjoStatus::Active.can_transition_to(&AjoStatus::Completed));
        assert!(AjoStatus::Active.can_transition_to(&AjoStatus::Cancelled));
    }

    #[test]
    fn closed_ajos_are_terminal() {
        assert!(AjoStatus::Completed.is_terminal());
        assert!(AjoStatus::Cancelled.is_terminal());
        assert!(AjoStatus::Cancelled.transition_to(AjoStatus::Active).is_err());
    }

    #[test]
    fn only_active_accepts_payments() {
        assert!(AjoStatus::Active.accepts_payments());
        assert!(!AjoStatus::Completed.accepts_payments());
        assert!(!AjoStatus::Cancelled.accepts_payments());
    }

    #[test]
    fn pending_invitation_can_be_answered_either_way() {
        assert!(InvitationStatus::Pending.can_transition_to(&InvitationStatus::Accepted));
        assert!(InvitationStatus::Pending.can_transition_to(&InvitationStatus::Declined));
    }

    #[test]
    fn answered_invitations_cannot_flip() {
        assert!(!InvitationStatus::Declined.can_transition_to(&InvitationStatus::Accepted));
        assert!(!InvitationStatus::Accepted.can_transition_to(&InvitationStatus::Declined));
    }

    #[test]
    fn pending_is_not_an_answer() {
        assert!(!InvitationStatus::Pending.is_answer());
        assert!(InvitationStatus::Accepted.is_answer());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&AjoStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn parses_stored_names() {
        assert_eq!("completed".parse::<AjoStatus>().unwrap(), AjoStatus::Completed);
        assert_eq!(
            "declined".parse::<InvitationStatus>().unwrap(),
            InvitationStatus::Declined
        );
        assert!("archived".parse::<AjoStatus>().is_err());
    }
}

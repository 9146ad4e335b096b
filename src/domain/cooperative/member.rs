//! Cooperative member projection.
//!
//! Members are owned by the cooperative module. The Ajo workflows only read
//! them: to check who belongs to a cooperative, who administers it, and how
//! to reach a member (in-app for linked users, email when an address exists).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CooperativeId, MemberId, UserId};

/// Role of a member inside their cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    /// Parses the stored role name; anything unknown is a plain member.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => MemberRole::Admin,
            _ => MemberRole::Member,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

/// Registered user account linked to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Contact details kept on the member row for members without an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A member of one cooperative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub cooperative_id: CooperativeId,
    pub role: MemberRole,
    pub user: Option<LinkedUser>,
    pub offline: OfflineContact,
    pub is_offline_member: bool,
}

/// Flattened "who is this" view used in rosters and statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIdentity {
    pub member_id: MemberId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_offline_member: bool,
}

impl Member {
    /// True when the member can be reached in-app: a linked account and
    /// not flagged as an offline member.
    pub fn is_online(&self) -> bool {
        !self.is_offline_member && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    /// The linked account id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    /// Best email address: the account's, then the offline record's.
    pub fn email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .or(self.offline.email.as_deref())
    }

    /// Identity from the linked user, falling back to the offline fields.
    pub fn identity(&self) -> MemberIdentity {
        match &self.user {
            Some(user) => MemberIdentity {
                member_id: self.id,
                user_id: Some(user.id.clone()),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
                is_offline_member: self.is_offline_member,
            },
            None => MemberIdentity {
                member_id: self.id,
                user_id: None,
                first_name: self.offline.first_name.clone().unwrap_or_default(),
                last_name: self.offline.last_name.clone().unwrap_or_default(),
                email: self.offline.email.clone(),
                phone: self.offline.phone.clone(),
                is_offline_member: self.is_offline_member,
            },
        }
    }

    /// "First Last", trimmed; used in notification copy.
    pub fn display_name(&self) -> String {
        let identity = self.identity();
        format!("{} {}", identity.first_name, identity.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online_member() -> Member {
        Member {
            id: MemberId::new(),
            cooperative_id: CooperativeId::new(),
            role: MemberRole::Member,
            user: Some(LinkedUser {
                id: UserId::new("user-1").unwrap(),
                first_name: "Ada".to_string(),
                last_name: "Obi".to_string(),
                email: Some("ada@example.com".to_string()),
                phone: None,
            }),
            offline: OfflineContact::default(),
            is_offline_member: false,
        }
    }

    fn offline_member() -> Member {
        Member {
            id: MemberId::new(),
            cooperative_id: CooperativeId::new(),
            role: MemberRole::Member,
            user: None,
            offline: OfflineContact {
                first_name: Some("Bayo".to_string()),
                last_name: Some("Ade".to_string()),
                email: None,
                phone: Some("+2348000000000".to_string()),
            },
            is_offline_member: true,
        }
    }

    #[test]
    fn identity_prefers_linked_user() {
        let member = online_member();
        let identity = member.identity();
        assert_eq!(identity.first_name, "Ada");
        assert_eq!(identity.user_id, Some(UserId::new("user-1").unwrap()));
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn identity_falls_back_to_offline_fields() {
        let member = offline_member();
        let identity = member.identity();
        assert_eq!(identity.first_name, "Bayo");
        assert_eq!(identity.last_name, "Ade");
        assert!(identity.user_id.is_none());
        assert!(identity.is_offline_member);
    }

    #[test]
    fn online_requires_linked_user_and_no_offline_flag() {
        assert!(online_member().is_online());
        assert!(!offline_member().is_online());

        let mut flagged = online_member();
        flagged.is_offline_member = true;
        assert!(!flagged.is_online());
    }

    #[test]
    fn email_falls_back_to_offline_record() {
        let mut member = offline_member();
        assert!(member.email().is_none());
        member.offline.email = Some("bayo@example.com".to_string());
        assert_eq!(member.email(), Some("bayo@example.com"));
    }

    #[test]
    fn role_parsing_defaults_to_member() {
        assert_eq!(MemberRole::from_db("admin"), MemberRole::Admin);
        assert_eq!(MemberRole::from_db("treasurer"), MemberRole::Member);
    }

    #[test]
    fn display_name_joins_names() {
        assert_eq!(online_member().display_name(), "Ada Obi");
    }
}

//! HTTP DTOs for the Ajo endpoints.
//!
//! JSON keys are camelCase. Dates are accepted as RFC 3339 timestamps or
//! plain `YYYY-MM-DD` dates and returned as RFC 3339.

use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{AjoDetail, CreateAjoResult, MemberStatement, RecordPaymentResult, RosterEntry};
use crate::domain::ajo::{
    Ajo, AjoChanges, AjoFrequency, AjoMember, AjoPayment, AjoSettings, AjoStatus,
    InvitationStatus, StatementSummary,
};
use crate::domain::cooperative::MemberIdentity;
use crate::domain::foundation::{
    AjoId, CooperativeId, MemberId, PaymentId, Timestamp, UserId, ValidationError,
};
use crate::ports::{AjoSummary, PendingInvitation};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub commission_rate: f64,
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAjoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    pub frequency: AjoFrequency,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_continuous: bool,
    #[serde(default)]
    pub member_ids: Vec<MemberId>,
}

/// Partial update; absent keys leave the field untouched. An explicit
/// `null` clears `description` or `endDate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAjoRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    pub frequency: Option<AjoFrequency>,
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<String>>,
    pub is_continuous: Option<bool>,
    pub status: Option<AjoStatus>,
}

impl UpdateAjoRequest {
    pub fn into_changes(self) -> Result<AjoChanges, ValidationError> {
        Ok(AjoChanges {
            title: self.title,
            description: self.description,
            amount: self.amount,
            frequency: self.frequency,
            start_date: parse_optional("startDate", self.start_date)?,
            end_date: self
                .end_date
                .map(|end| parse_optional("endDate", end))
                .transpose()?,
            is_continuous: self.is_continuous,
            status: self.status,
        })
    }
}

/// A present key, `null` included, becomes `Some`. Absent keys fall back to
/// `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondToInvitationRequest {
    pub status: InvitationStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub member_id: MemberId,
    pub amount: f64,
    pub payment_method: String,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseAjoRequest {
    pub status: AjoStatus,
}

pub fn parse_optional(
    field: &str,
    value: Option<String>,
) -> Result<Option<Timestamp>, ValidationError> {
    value.map(|v| Timestamp::parse(field, &v)).transpose()
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub cooperative_id: CooperativeId,
    pub commission_rate: f64,
    pub interest_rate: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<AjoSettings> for SettingsResponse {
    fn from(s: AjoSettings) -> Self {
        Self {
            cooperative_id: s.cooperative_id,
            commission_rate: s.commission_rate,
            interest_rate: s.interest_rate,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AjoResponse {
    pub id: AjoId,
    pub cooperative_id: CooperativeId,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub frequency: AjoFrequency,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_continuous: bool,
    pub status: AjoStatus,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Ajo> for AjoResponse {
    fn from(a: Ajo) -> Self {
        Self {
            id: a.id,
            cooperative_id: a.cooperative_id,
            title: a.title,
            description: a.description,
            amount: a.amount,
            frequency: a.frequency,
            start_date: a.start_date,
            end_date: a.end_date,
            is_continuous: a.is_continuous,
            status: a.status,
            created_by: a.created_by,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AjoMemberResponse {
    pub ajo_id: AjoId,
    pub member_id: MemberId,
    pub status: InvitationStatus,
    pub total_paid: f64,
    pub invited_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

impl From<AjoMember> for AjoMemberResponse {
    fn from(m: AjoMember) -> Self {
        Self {
            ajo_id: m.ajo_id,
            member_id: m.member_id,
            status: m.status,
            total_paid: m.total_paid,
            invited_at: m.invited_at,
            responded_at: m.responded_at,
        }
    }
}

/// Who a member is: the linked user, or the offline contact fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: MemberId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_offline_member: bool,
}

impl From<MemberIdentity> for MemberResponse {
    fn from(i: MemberIdentity) -> Self {
        Self {
            id: i.member_id,
            user_id: i.user_id,
            first_name: i.first_name,
            last_name: i.last_name,
            email: i.email,
            phone: i.phone,
            is_offline_member: i.is_offline_member,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryResponse {
    #[serde(flatten)]
    pub membership: AjoMemberResponse,
    pub member: MemberResponse,
}

impl From<RosterEntry> for RosterEntryResponse {
    fn from(e: RosterEntry) -> Self {
        Self {
            membership: e.membership.into(),
            member: e.identity.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub ajo_id: AjoId,
    pub member_id: MemberId,
    pub amount: f64,
    pub payment_method: String,
    pub payment_date: Timestamp,
    pub reference_number: Option<String>,
    pub recorded_by: UserId,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl From<AjoPayment> for PaymentResponse {
    fn from(p: AjoPayment) -> Self {
        Self {
            id: p.id,
            ajo_id: p.ajo_id,
            member_id: p.member_id,
            amount: p.amount,
            payment_method: p.payment_method,
            payment_date: p.payment_date,
            reference_number: p.reference_number,
            recorded_by: p.recorded_by,
            notes: p.notes,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AjoListItemResponse {
    #[serde(flatten)]
    pub ajo: AjoResponse,
    pub my_membership: Option<AjoMemberResponse>,
    pub member_count: u64,
    pub payment_count: u64,
}

impl From<AjoSummary> for AjoListItemResponse {
    fn from(s: AjoSummary) -> Self {
        Self {
            ajo: s.ajo.into(),
            my_membership: s.my_membership.map(Into::into),
            member_count: s.member_count,
            payment_count: s.payment_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AjoDetailResponse {
    #[serde(flatten)]
    pub ajo: AjoResponse,
    pub members: Vec<RosterEntryResponse>,
    pub payments: Vec<PaymentResponse>,
}

impl From<AjoDetail> for AjoDetailResponse {
    fn from(d: AjoDetail) -> Self {
        Self {
            ajo: d.ajo.into(),
            members: d.members.into_iter().map(Into::into).collect(),
            payments: d.payments.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateAjoResult> for AjoDetailResponse {
    fn from(r: CreateAjoResult) -> Self {
        Self {
            ajo: r.ajo.into(),
            members: r.members.into_iter().map(Into::into).collect(),
            payments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentResponse {
    pub payment: PaymentResponse,
    pub membership: AjoMemberResponse,
}

impl From<RecordPaymentResult> for RecordPaymentResponse {
    fn from(r: RecordPaymentResult) -> Self {
        Self {
            payment: r.payment.into(),
            membership: r.membership.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    pub ajo: AjoResponse,
    pub member: MemberResponse,
    pub membership: AjoMemberResponse,
    pub summary: StatementSummary,
    pub payments: Vec<PaymentResponse>,
}

impl From<MemberStatement> for StatementResponse {
    fn from(s: MemberStatement) -> Self {
        Self {
            ajo: s.ajo.into(),
            member: s.member.into(),
            membership: s.membership.into(),
            summary: s.summary,
            payments: s.payments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitationResponse {
    #[serde(flatten)]
    pub invitation: AjoMemberResponse,
    pub ajo: AjoResponse,
    pub member_count: u64,
}

impl From<PendingInvitation> for PendingInvitationResponse {
    fn from(p: PendingInvitation) -> Self {
        Self {
            invitation: p.invitation.into(),
            ajo: p.ajo.into(),
            member_count: p.member_count,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
            details: Some(serde_json::json!({ "field": field })),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

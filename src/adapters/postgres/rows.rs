//! Row types shared by the Ajo repository and reader.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment, AjoSettings};
use crate::domain::foundation::{
    AjoId, CooperativeId, DomainError, ErrorCode, MemberId, PaymentId, Timestamp, UserId,
};

/// Wraps a sqlx failure with what we were doing at the time.
pub(super) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, DomainError> {
    value.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value: {}", column, value),
        )
    })
}

pub(super) fn parse_user_id(column: &str, value: String) -> Result<UserId, DomainError> {
    UserId::new(value).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", column, e))
    })
}

fn ts(value: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(value)
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SettingsRow {
    cooperative_id: Uuid,
    commission_rate: f64,
    interest_rate: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for AjoSettings {
    fn from(row: SettingsRow) -> Self {
        AjoSettings {
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            commission_rate: row.commission_rate,
            interest_rate: row.interest_rate,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AjoRow {
    id: Uuid,
    cooperative_id: Uuid,
    title: String,
    description: Option<String>,
    amount: f64,
    frequency: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    is_continuous: bool,
    status: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AjoRow> for Ajo {
    type Error = DomainError;

    fn try_from(row: AjoRow) -> Result<Self, Self::Error> {
        Ok(Ajo {
            id: AjoId::from_uuid(row.id),
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            title: row.title,
            description: row.description,
            amount: row.amount,
            frequency: parse_column("frequency", &row.frequency)?,
            start_date: ts(row.start_date),
            end_date: row.end_date.map(ts),
            is_continuous: row.is_continuous,
            status: parse_column("status", &row.status)?,
            created_by: parse_user_id("created_by", row.created_by)?,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

/// An Ajo row with its roster and payment counts.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AjoCountsRow {
    #[sqlx(flatten)]
    pub ajo: AjoRow,
    pub member_count: i64,
    pub payment_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AjoMemberRow {
    ajo_id: Uuid,
    member_id: Uuid,
    status: String,
    total_paid: f64,
    invited_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl TryFrom<AjoMemberRow> for AjoMember {
    type Error = DomainError;

    fn try_from(row: AjoMemberRow) -> Result<Self, Self::Error> {
        Ok(AjoMember {
            ajo_id: AjoId::from_uuid(row.ajo_id),
            member_id: MemberId::from_uuid(row.member_id),
            status: parse_column("status", &row.status)?,
            total_paid: row.total_paid,
            invited_at: ts(row.invited_at),
            responded_at: row.responded_at.map(ts),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentRow {
    id: Uuid,
    ajo_id: Uuid,
    member_id: Uuid,
    amount: f64,
    payment_method: String,
    payment_date: DateTime<Utc>,
    reference_number: Option<String>,
    recorded_by: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for AjoPayment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(AjoPayment {
            id: PaymentId::from_uuid(row.id),
            ajo_id: AjoId::from_uuid(row.ajo_id),
            member_id: MemberId::from_uuid(row.member_id),
            amount: row.amount,
            payment_method: row.payment_method,
            payment_date: ts(row.payment_date),
            reference_number: row.reference_number,
            recorded_by: parse_user_id("recorded_by", row.recorded_by)?,
            notes: row.notes,
            created_at: ts(row.created_at),
        })
    }
}

/// Converts a batch of rows, failing on the first bad one.
pub(super) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub(super) const AJO_COLUMNS: &str = "a.id, a.cooperative_id, a.title, a.description, a.amount, \
     a.frequency, a.start_date, a.end_date, a.is_continuous, a.status, a.created_by, \
     a.created_at, a.updated_at";

pub(super) const AJO_COUNTS: &str = "(SELECT COUNT(*) FROM ajo_members m WHERE m.ajo_id = a.id) AS member_count, \
     (SELECT COUNT(*) FROM ajo_payments p WHERE p.ajo_id = a.id) AS payment_count";

pub(super) const MEMBER_COLUMNS: &str =
    "ajo_id, member_id, status, total_paid, invited_at, responded_at";

pub(super) const PAYMENT_COLUMNS: &str = "id, ajo_id, member_id, amount, payment_method, \
     payment_date, reference_number, recorded_by, notes, created_at";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ajo::{AjoFrequency, AjoStatus, InvitationStatus};

    fn ajo_row() -> AjoRow {
        let now = Utc::now();
        AjoRow {
            id: Uuid::new_v4(),
            cooperative_id: Uuid::new_v4(),
            title: "Market Ajo".to_string(),
            description: None,
            amount: 500.0,
            frequency: "monthly".to_string(),
            start_date: now,
            end_date: None,
            is_continuous: true,
            status: "completed".to_string(),
            created_by: "admin-1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ajo_row_maps_enums() {
        let ajo = Ajo::try_from(ajo_row()).unwrap();
        assert_eq!(ajo.frequency, AjoFrequency::Monthly);
        assert_eq!(ajo.status, AjoStatus::Completed);
        assert_eq!(ajo.created_by.as_str(), "admin-1");
    }

    #[test]
    fn unknown_status_is_a_database_error() {
        let mut row = ajo_row();
        row.status = "archived".to_string();
        let err = Ajo::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn blank_creator_is_rejected() {
        let mut row = ajo_row();
        row.created_by = " ".to_string();
        assert!(Ajo::try_from(row).is_err());
    }

    #[test]
    fn member_row_maps_status() {
        let row = AjoMemberRow {
            ajo_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            status: "accepted".to_string(),
            total_paid: 1500.0,
            invited_at: Utc::now(),
            responded_at: Some(Utc::now()),
        };
        let member = AjoMember::try_from(row).unwrap();
        assert_eq!(member.status, InvitationStatus::Accepted);
        assert_eq!(member.total_paid, 1500.0);
    }
}

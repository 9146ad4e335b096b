//! Ajo aggregate.
//!
//! An Ajo is a named recurring-contribution arrangement inside one
//! cooperative: a fixed amount per period, a frequency, a start date and
//! either an end date or an open-ended ("continuous") run.
//!
//! # Invariants
//!
//! - `title` is non-empty and `amount` is a positive, finite number
//! - when not continuous, `end_date` (if set) is not before `start_date`
//! - `status` only changes along `AjoStatus` transitions
//! - Ajos are never deleted; closing them is a status change

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AjoId, CooperativeId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::{AjoError, AjoFrequency, AjoStatus};

/// Input for creating an Ajo.
#[derive(Debug, Clone)]
pub struct NewAjo {
    pub cooperative_id: CooperativeId,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub frequency: AjoFrequency,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_continuous: bool,
    pub created_by: UserId,
}

/// Partial update; `None` leaves the field untouched.
///
/// `description` and `end_date` are optional on the Ajo itself, so
/// `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct AjoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    pub frequency: Option<AjoFrequency>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Option<Timestamp>>,
    pub is_continuous: Option<bool>,
    pub status: Option<AjoStatus>,
}

impl AjoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.frequency.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_continuous.is_none()
            && self.status.is_none()
    }

    /// Names of the fields this update touches, for audit metadata.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.amount.is_some() {
            fields.push("amount");
        }
        if self.frequency.is_some() {
            fields.push("frequency");
        }
        if self.start_date.is_some() {
            fields.push("startDate");
        }
        if self.end_date.is_some() {
            fields.push("endDate");
        }
        if self.is_continuous.is_some() {
            fields.push("isContinuous");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        fields
    }
}

/// A rotating-savings arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ajo {
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

impl Ajo {
    /// Creates a new active Ajo after validating the input.
    pub fn create(input: NewAjo) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        let ajo = Self {
            id: AjoId::new(),
            cooperative_id: input.cooperative_id,
            title: input.title.trim().to_string(),
            description: input.description,
            amount: input.amount,
            frequency: input.frequency,
            start_date: input.start_date,
            end_date: input.end_date,
            is_continuous: input.is_continuous,
            status: AjoStatus::Active,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        ajo.validate()?;
        Ok(ajo)
    }

    /// Applies a partial update. On error the Ajo is left unchanged.
    pub fn apply(&mut self, changes: AjoChanges) -> Result<(), AjoError> {
        let mut next = self.clone();

        if let Some(title) = changes.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            next.description = description;
        }
        if let Some(amount) = changes.amount {
            next.amount = amount;
        }
        if let Some(frequency) = changes.frequency {
            next.frequency = frequency;
        }
        if let Some(start_date) = changes.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            next.end_date = end_date;
        }
        if let Some(is_continuous) = changes.is_continuous {
            next.is_continuous = is_continuous;
        }
        if let Some(status) = changes.status {
            if status != next.status {
                next.status = next
                    .status
                    .transition_to(status)
                    .map_err(|e| AjoError::bad_request(e.to_string()))?;
            }
        }

        next.validate()?;
        next.updated_at = Timestamp::now();
        *self = next;
        Ok(())
    }

    /// Moves an active Ajo to `completed` or `cancelled`.
    pub fn close(&mut self, status: AjoStatus) -> Result<(), AjoError> {
        if status == AjoStatus::Active {
            return Err(AjoError::validation(
                "status",
                "an Ajo can only be closed as completed or cancelled",
            ));
        }
        self.status = self
            .status
            .transition_to(status)
            .map_err(|e| AjoError::bad_request(e.to_string()))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// End date that bounds the expected-payment schedule, if any.
    ///
    /// Continuous Ajos ignore their end date.
    pub fn schedule_end(&self) -> Option<&Timestamp> {
        if self.is_continuous {
            None
        } else {
            self.end_date.as_ref()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::not_positive("amount", self.amount));
        }
        if let Some(end) = self.schedule_end() {
            if end.is_before(&self.start_date) {
                return Err(ValidationError::invalid_format(
                    "endDate",
                    "end date cannot be before start date",
                ));
            }
        }
        Ok(())
    }
}

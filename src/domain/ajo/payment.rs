//! Ajo payments. Append-only: a payment is never edited or reversed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AjoId, MemberId, PaymentId, Timestamp, UserId, ValidationError};

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub member_id: MemberId,
    pub amount: f64,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub payment_date: Option<Timestamp>,
}

/// A contribution recorded against one Ajo member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AjoPayment {
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

impl AjoPayment {
    /// Builds a payment; `payment_date` defaults to now.
    pub fn record(ajo_id: AjoId, recorded_by: UserId, input: NewPayment) -> Result<Self, ValidationError> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(ValidationError::not_positive("amount", input.amount));
        }
        let payment_method = input.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(ValidationError::empty_field("paymentMethod"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: PaymentId::new(),
            ajo_id,
            member_id: input.member_id,
            amount: input.amount,
            payment_method,
            payment_date: input.payment_date.unwrap_or(now),
            reference_number: input.reference_number,
            recorded_by,
            notes: input.notes,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(amount: f64) -> NewPayment {
        NewPayment {
            member_id: MemberId::new(),
            amount,
            payment_method: "cash".to_string(),
            reference_number: None,
            notes: None,
            payment_date: None,
        }
    }

    fn recorder() -> UserId {
        UserId::new("admin-1").unwrap()
    }

    #[test]
    fn payment_date_defaults_to_now() {
        let before = Timestamp::now();
        let payment = AjoPayment::record(AjoId::new(), recorder(), input(500.0)).unwrap();
        assert!(!payment.payment_date.is_before(&before));
    }

    #[test]
    fn explicit_payment_date_is_kept() {
        let date = Timestamp::parse("paymentDate", "2026-01-08").unwrap();
        let mut input = input(500.0);
        input.payment_date = Some(date);
        let payment = AjoPayment::record(AjoId::new(), recorder(), input).unwrap();
        assert_eq!(payment.payment_date, date);
    }

    #[test]
    fn rejects_zero_amount() {
        let err = AjoPayment::record(AjoId::new(), recorder(), input(0.0)).unwrap_err();
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn rejects_blank_method() {
        let mut input = input(100.0);
        input.payment_method = "  ".to_string();
        let err = AjoPayment::record(AjoId::new(), recorder(), input).unwrap_err();
        assert_eq!(err.field(), "paymentMethod");
    }
}

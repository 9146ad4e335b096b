//! Per-cooperative Ajo settings (commission and interest rates).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CooperativeId, Timestamp, ValidationError};

/// Commission and interest rates applied to member statements.
///
/// Rates are percentages. They must be non-negative and finite; there is
/// no upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AjoSettings {
    pub cooperative_id: CooperativeId,
    pub commission_rate: f64,
    pub interest_rate: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AjoSettings {
    /// Zero-rate settings, as created on first read.
    pub fn defaults_for(cooperative_id: CooperativeId) -> Self {
        let now = Timestamp::now();
        Self {
            cooperative_id,
            commission_rate: 0.0,
            interest_rate: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces both rates after validating them.
    pub fn set_rates(&mut self, commission_rate: f64, interest_rate: f64) -> Result<(), ValidationError> {
        validate_rate("commissionRate", commission_rate)?;
        validate_rate("interestRate", interest_rate)?;
        self.commission_rate = commission_rate;
        self.interest_rate = interest_rate;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn validate_rate(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::invalid_format(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::negative(field, value));
    }
    Ok(())
}

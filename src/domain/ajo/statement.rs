//! Member statement math.
//!
//! Expected payments are only known for a bounded Ajo: the day span from
//! start to end, divided by the period length and rounded up. Commission
//! and interest are percentages of what the member has actually paid.

use serde::{Deserialize, Serialize};

use super::{Ajo, AjoMember, AjoSettings};

/// Number of contributions a member is expected to make over the Ajo.
///
/// Zero for continuous or open-ended Ajos, and for a reversed date range.
pub fn expected_payments(ajo: &Ajo) -> u32 {
    let Some(end) = ajo.schedule_end() else {
        return 0;
    };
    let days = ajo.start_date.days_until(end);
    if days <= 0 {
        return 0;
    }
    let period = ajo.frequency.period_days();
    let periods = (days + period - 1) / period;
    u32::try_from(periods).unwrap_or(u32::MAX)
}

/// Computed summary block of a member statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSummary {
    pub total_paid: f64,
    pub expected_payments: u32,
    pub total_expected: f64,
    /// What is still owed against the schedule; zero when fully paid or unbounded.
    pub outstanding: f64,
    pub commission_rate: f64,
    pub interest_rate: f64,
    pub commission: f64,
    pub interest: f64,
    pub net_amount: f64,
    pub payment_count: usize,
}

impl StatementSummary {
    pub fn compute(
        ajo: &Ajo,
        member: &AjoMember,
        settings: &AjoSettings,
        payment_count: usize,
    ) -> Self {
        let expected = expected_payments(ajo);
        let total_expected = f64::from(expected) * ajo.amount;
        let total_paid = member.total_paid;
        let commission = total_paid * settings.commission_rate / 100.0;
        let interest = total_paid * settings.interest_rate / 100.0;

        Self {
            total_paid,
            expected_payments: expected,
            total_expected,
            outstanding: (total_expected - total_paid).max(0.0),
            commission_rate: settings.commission_rate,
            interest_rate: settings.interest_rate,
            commission,
            interest,
            net_amount: total_paid - commission + interest,
            payment_count,
        }
    }
}

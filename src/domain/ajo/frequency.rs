//! Contribution frequency of an Ajo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How often members are expected to contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AjoFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl AjoFrequency {
    /// Length of one contribution period in days.
    ///
    /// Months are a flat 30 days, not calendar months.
    pub fn period_days(&self) -> i64 {
        match self {
            AjoFrequency::Daily => 1,
            AjoFrequency::Weekly => 7,
            AjoFrequency::Monthly => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AjoFrequency::Daily => "daily",
            AjoFrequency::Weekly => "weekly",
            AjoFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for AjoFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AjoFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(AjoFrequency::Daily),
            "weekly" => Ok(AjoFrequency::Weekly),
            "monthly" => Ok(AjoFrequency::Monthly),
            other => Err(ValidationError::invalid_format(
                "frequency",
                format!("unknown frequency '{}'", other),
            )),
        }
    }
}

//! Ajo module - rotating savings arrangements.
//!
//! # Module Structure
//!
//! - `aggregate` - The Ajo itself and its partial-update rules
//! - `membership` - Per-member invitation status and running total
//! - `payment` - Append-only payment records
//! - `settings` - Per-cooperative commission/interest rates
//! - `statement` - Expected-vs-paid and commission/interest math
//! - `status` / `frequency` - Enumerations with their transition tables
//! - `errors` - `AjoError`, mapped to HTTP by the adapter

pub(crate) mod aggregate;
mod errors;
mod frequency;
mod membership;
mod payment;
mod settings;
mod statement;
mod status;

pub use aggregate::{Ajo, AjoChanges, NewAjo};
pub use errors::AjoError;
pub use frequency::AjoFrequency;
pub use membership::AjoMember;
pub use payment::{AjoPayment, NewPayment};
pub use settings::AjoSettings;
pub use statement::{expected_payments, StatementSummary};
pub use status::{AjoStatus, InvitationStatus};

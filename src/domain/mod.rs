//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `cooperative` - Member records owned by the cooperative module
//! - `ajo` - Rotating savings: Ajo lifecycle, invitations, payments, statements
//! - `activity` - Audit records appended for every Ajo mutation

pub mod activity;
pub mod ajo;
pub mod cooperative;
pub mod foundation;

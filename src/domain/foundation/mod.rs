//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, status machinery and error types
//! that form the vocabulary of the CoopManager domain.

mod auth;
mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AjoId, CooperativeId, MemberId, PaymentId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

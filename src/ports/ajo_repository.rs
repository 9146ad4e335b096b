//! Ajo repository port (write side).
//!
//! Defines the contract for persisting Ajo aggregates, their memberships,
//! payments and the per-cooperative settings row.
//!
//! # Atomicity
//!
//! - `create` writes the Ajo and every membership row together or not at all
//! - `record_payment` appends the payment and increments the member's
//!   `total_paid` in the same transaction

use crate::domain::ajo::{Ajo, AjoMember, AjoPayment, AjoSettings, AjoStatus};
use crate::domain::foundation::{CooperativeId, DomainError};
use async_trait::async_trait;

/// Repository port for Ajo persistence.
#[async_trait]
pub trait AjoRepository: Send + Sync {
    /// Returns the cooperative's settings, inserting zero-rate defaults if
    /// none exist yet. Idempotent.
    async fn find_or_create_settings(
        &self,
        cooperative_id: &CooperativeId,
    ) -> Result<AjoSettings, DomainError>;

    /// Inserts or replaces the settings row for the cooperative.
    async fn save_settings(&self, settings: &AjoSettings) -> Result<(), DomainError>;

    /// Persists a new Ajo together with its initial memberships.
    async fn create(&self, ajo: &Ajo, members: &[AjoMember]) -> Result<(), DomainError>;

    /// Writes an Ajo's editable fields and status, provided the stored status
    /// is still `expected_status`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the Ajo doesn't exist
    /// - `BadRequest` if its status changed since it was read
    async fn update(&self, ajo: &Ajo, expected_status: AjoStatus) -> Result<(), DomainError>;

    /// Updates a membership's invitation status and response time.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the membership doesn't exist
    async fn update_member(&self, member: &AjoMember) -> Result<(), DomainError>;

    /// Appends a payment and credits the member's running total.
    ///
    /// Returns the membership as it stands after the credit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the membership doesn't exist (nothing is written)
    async fn record_payment(&self, payment: &AjoPayment) -> Result<AjoMember, DomainError>;
}

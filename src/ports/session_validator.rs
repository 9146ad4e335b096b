//! Session validation port for bearer token validation.
//!
//! HTTP middleware hands the raw token to this port and receives the
//! authenticated caller. Implementations must reject bad signatures and
//! expired tokens.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a bearer token (without the "Bearer " prefix).
    ///
    /// * `Err(AuthError::InvalidToken)` - malformed token or bad signature
    /// * `Err(AuthError::TokenExpired)` - valid signature but expired
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn SessionValidator) {}
    }
}

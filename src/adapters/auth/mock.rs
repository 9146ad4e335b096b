//! Mock session validator for tests and local development.
//!
//! # Example
//!
//! ```ignore
//! use coop_manager::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new().with_test_user("admin-token", "admin-1");
//! let user = validator.validate("admin-token").await?;
//! assert_eq!(user.id.as_str(), "admin-1");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Stores a map of tokens to users. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a user.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Registers a token for a user id with a generated email.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is blank.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(user_id.clone()).expect("test user id must not be blank"),
            Some(format!("{}@test.example.com", user_id)),
        );
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockSessionValidator: lock poisoned") = Some(error);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .expect("MockSessionValidator: lock poisoned")
            .insert(token.into(), user);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let forced = self
            .force_error
            .read()
            .map_err(|_| AuthError::ServiceUnavailable("mock validator lock poisoned".to_string()))?
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        self.tokens
            .read()
            .map_err(|_| AuthError::ServiceUnavailable("mock validator lock poisoned".to_string()))?
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_user_for_registered_token() {
        let user = AuthenticatedUser::new(UserId::new("user-1").unwrap(), None);
        let validator = MockSessionValidator::new().with_user("token-1", user.clone());

        assert_eq!(validator.validate("token-1").await, Ok(user));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new().with_test_user("token-1", "user-1");
        assert_eq!(validator.validate("nope").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_user_gets_generated_email() {
        let validator = MockSessionValidator::new().with_test_user("t", "ada");
        let user = validator.validate("t").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@test.example.com"));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_test_user("t", "ada")
            .with_error(AuthError::TokenExpired);
        assert_eq!(validator.validate("t").await, Err(AuthError::TokenExpired));
    }
}

//! Ajo-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | BadRequest | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised by the Ajo workflows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AjoError {
    /// A required entity does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The caller may not perform this operation.
    #[error("{0}")]
    Forbidden(String),

    /// The operation is not valid in the current state.
    #[error("{0}")]
    BadRequest(String),

    /// Input failed validation.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Storage or other infrastructure failure.
    #[error("Internal error: {0}")]
    Infrastructure(String),
}

impl AjoError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AjoError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AjoError::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AjoError::BadRequest(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AjoError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AjoError::NotFound { .. } => ErrorCode::NotFound,
            AjoError::Forbidden(_) => ErrorCode::Forbidden,
            AjoError::BadRequest(_) => ErrorCode::BadRequest,
            AjoError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AjoError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for AjoError {
    fn from(err: ValidationError) -> Self {
        AjoError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for AjoError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound => AjoError::NotFound {
                resource: "Resource",
                id: err.message,
            },
            ErrorCode::Forbidden => AjoError::Forbidden(err.message),
            ErrorCode::BadRequest => AjoError::BadRequest(err.message),
            ErrorCode::ValidationFailed => AjoError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                AjoError::Infrastructure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource() {
        let err = AjoError::not_found("Ajo", "abc");
        assert_eq!(err.to_string(), "Ajo not found: abc");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: AjoError = ValidationError::empty_field("title").into();
        assert!(matches!(err, AjoError::ValidationFailed { ref field, .. } if field == "title"));
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: AjoError = DomainError::database("connection reset").into();
        assert!(matches!(err, AjoError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn forbidden_domain_error_keeps_message() {
        let err: AjoError = DomainError::new(ErrorCode::Forbidden, "nope").into();
        assert_eq!(err, AjoError::Forbidden("nope".to_string()));
    }
}

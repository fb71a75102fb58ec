//! # Storefront Error Type
//!
//! What callers of the storefront services see when something fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationErrors ──┐                                                  │
//! │  CoreError ─────────┼──► StorefrontError ──► kind() ──► ErrorResponse  │
//! │  DbError ───────────┘         │                          { code,       │
//! │                               │                            message,    │
//! │                               │                            details }   │
//! │                               ▼                                         │
//! │                    tracing::error! for storage                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Kind | Raised for |
//! |---|---|
//! | `VALIDATION_ERROR` | bad request fields, unknown/unavailable dishes, illegal status moves |
//! | `AUTHENTICATION_ERROR` | no identity where one is required |
//! | `AUTHORIZATION_ERROR` | identity present but not an admin |
//! | `NOT_FOUND` | unknown order or dish id |
//! | `STORAGE_ERROR` | the database failed; nothing was written |
//! | `INTERNAL` | anything else |

use serde::Serialize;

use platter_core::{CoreError, OrderStatus, ValidationError, ValidationErrors};
use platter_db::DbError;

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "AUTHENTICATION_ERROR")]
    Authentication,
    #[serde(rename = "AUTHORIZATION_ERROR")]
    Authorization,
    NotFound,
    #[serde(rename = "STORAGE_ERROR")]
    Storage,
    Internal,
}

/// Storefront service errors.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error(transparent)]
    InvalidRequest(#[from] ValidationErrors),

    /// Some requested dishes are unknown or off the menu; nothing was written.
    #[error("Items not found or unavailable: {}", .missing.join(", "))]
    ItemsUnavailable { missing: Vec<String> },

    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Admin access required")]
    AdminRequired,

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Storage failure: {0}")]
    Storage(#[source] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorefrontError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        StorefrontError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorefrontError::InvalidRequest(_)
            | StorefrontError::ItemsUnavailable { .. }
            | StorefrontError::InvalidTransition { .. } => ErrorKind::Validation,
            StorefrontError::AuthenticationRequired | StorefrontError::InvalidToken(_) => ErrorKind::Authentication,
            StorefrontError::AdminRequired => ErrorKind::Authorization,
            StorefrontError::NotFound { .. } => ErrorKind::NotFound,
            StorefrontError::Storage(_) => ErrorKind::Storage,
            StorefrontError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Field-level failures, when this is a request validation error.
    pub fn details(&self) -> &[ValidationError] {
        match self {
            StorefrontError::InvalidRequest(errors) => &errors.errors,
            _ => &[],
        }
    }

    /// Serializable form for callers.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.kind(),
            message: self.public_message(),
            details: self.details().to_vec(),
        }
    }

    /// Storage internals stay in the logs; callers get a generic message.
    fn public_message(&self) -> String {
        match self {
            StorefrontError::Storage(_) => "Database operation failed".to_string(),
            StorefrontError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error body returned to callers.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Invalid request: address.city is required",
///   "details": [{ "kind": "required", "field": "address.city" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl From<StorefrontError> for ErrorResponse {
    fn from(err: StorefrontError) -> Self {
        err.to_response()
    }
}

/// Converts database errors, logging anything that isn't a plain miss.
impl From<DbError> for StorefrontError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StorefrontError::NotFound { entity, id },
            other => {
                tracing::error!(error = %other, transient = other.is_transient(), "Storage operation failed");
                StorefrontError::Storage(other)
            }
        }
    }
}

impl From<CoreError> for StorefrontError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemsUnavailable { missing, .. } => StorefrontError::ItemsUnavailable { missing },
            CoreError::InvalidStatusTransition { from, to } => StorefrontError::InvalidTransition { from, to },
            CoreError::Validation(errors) => StorefrontError::InvalidRequest(errors),
        }
    }
}

/// Result type for storefront services.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let validation: StorefrontError = ValidationErrors::single(ValidationError::Required {
            field: "items".to_string(),
        })
        .into();
        assert_eq!(validation.kind(), ErrorKind::Validation);
        assert_eq!(validation.details().len(), 1);

        let unavailable: StorefrontError = CoreError::ItemsUnavailable {
            requested: 2,
            resolved: 1,
            missing: vec!["x".to_string()],
        }
        .into();
        assert_eq!(unavailable.kind(), ErrorKind::Validation);
        assert_eq!(unavailable.to_string(), "Items not found or unavailable: x");

        assert_eq!(StorefrontError::AuthenticationRequired.kind(), ErrorKind::Authentication);
        assert_eq!(StorefrontError::AdminRequired.kind(), ErrorKind::Authorization);

        let missing: StorefrontError = DbError::not_found("Order", "o1").into();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let storage: StorefrontError = DbError::PoolExhausted.into();
        assert_eq!(storage.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_response_hides_storage_details() {
        let err: StorefrontError = DbError::QueryFailed("disk I/O error".to_string()).into();
        let response = err.to_response();
        assert_eq!(response.message, "Database operation failed");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "STORAGE_ERROR");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_validation_response_lists_fields() {
        let err = StorefrontError::InvalidRequest(ValidationErrors {
            errors: vec![ValidationError::Required {
                field: "address.city".to_string(),
            }],
        });
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"][0]["field"], "address.city");
    }
}

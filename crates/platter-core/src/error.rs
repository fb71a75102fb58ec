//! # Error Types
//!
//! Domain-specific error types for platter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  platter-core errors (this file)                                       │
//! │  ├── CoreError         - Business rule violations                      │
//! │  ├── ValidationError   - One failing field                             │
//! │  └── ValidationErrors  - Every failing field of one request            │
//! │                                                                         │
//! │  platter-db errors (separate crate)                                    │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── StorefrontError   - What callers see (kind + message)             │
//! │                                                                         │
//! │  Flow: ValidationErrors → CoreError → StorefrontError → Caller         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Some requested dishes do not exist or are not available right now.
    ///
    /// ## When This Occurs
    /// ```text
    /// Request: [butter-chicken × 1, deleted-dish × 2]
    ///      │
    ///      ▼
    /// Catalog lookup (available only): [butter-chicken]
    ///      │
    ///      ▼
    /// ItemsUnavailable { requested: 2, resolved: 1, missing: ["deleted-dish"] }
    ///      │
    ///      ▼
    /// Whole order rejected, nothing persisted
    /// ```
    #[error("Items not found or unavailable: {}", .missing.join(", "))]
    ItemsUnavailable {
        requested: usize,
        resolved: usize,
        missing: Vec<String>,
    },

    /// Order status cannot move from `from` to `to`.
    ///
    /// The lifecycle is linear and monotonic; there is no way back and
    /// nothing after `DELIVERED`.
    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Request failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single input validation failure, always tied to a field path
/// such as `address.city` or `items[2].qty`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same dish requested twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// The field path this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// Every field-level failure found while validating one request.
///
/// This is the failure half of the validation layer's tagged result:
/// `Result<Validated, ValidationErrors>`. It is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid request: {}", summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wraps a single failure.
    pub fn single(error: ValidationError) -> Self {
        ValidationErrors {
            errors: vec![error],
        }
    }

    /// Returns true if any failure concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors::single(error)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_unavailable_message() {
        let err = CoreError::ItemsUnavailable {
            requested: 2,
            resolved: 1,
            missing: vec!["dish-a".to_string()],
        };
        assert_eq!(err.to_string(), "Items not found or unavailable: dish-a");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "address.city".to_string(),
        };
        assert_eq!(err.to_string(), "address.city is required");
        assert_eq!(err.field(), "address.city");

        let err = ValidationError::MustBePositive {
            field: "items[0].qty".to_string(),
        };
        assert_eq!(err.to_string(), "items[0].qty must be positive");
    }

    #[test]
    fn test_validation_errors_summary() {
        let errors = ValidationErrors {
            errors: vec![
                ValidationError::Required {
                    field: "address.phone".to_string(),
                },
                ValidationError::Required {
                    field: "address.pincode".to_string(),
                },
            ],
        };
        assert_eq!(
            errors.to_string(),
            "Invalid request: address.phone is required; address.pincode is required"
        );
        assert!(errors.has_field("address.pincode"));
        assert!(!errors.has_field("address.city"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err: ValidationErrors = ValidationError::Required {
            field: "items".to_string(),
        }
        .into();
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_validation_error_serializes_with_kind_tag() {
        let err = ValidationError::Required {
            field: "address.line1".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "required");
        assert_eq!(json["field"], "address.line1");
    }
}

//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorefrontError::Storage / NotFound (in the storefront app)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ErrorResponse { code, message } shown to the caller                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Reusing an idempotency key outside the placement transaction
    /// - Inserting a dish with an existing id
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation (order item without its order).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK constraint rejected the row.
    #[error("Constraint violation: {0}")]
    CheckViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value no longer parses into its domain type.
    #[error("Corrupt {entity} row {id}: {reason}")]
    CorruptRow {
        entity: String,
        id: String,
        reason: String,
    },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(entity: impl Into<String>, id: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// True when retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::PoolExhausted | DbError::ConnectionFailed(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                //   "CHECK constraint failed: <expr>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(field, "unknown")
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_errors_are_transient() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_transient());
        assert!(!DbError::not_found("Order", "x").is_transient());
    }

    #[test]
    fn test_messages() {
        assert_eq!(DbError::not_found("Dish", "abc").to_string(), "Dish not found: abc");
        assert_eq!(
            DbError::duplicate("orders.idempotency_key", "k1").to_string(),
            "Duplicate orders.idempotency_key: 'k1' already exists"
        );
    }
}

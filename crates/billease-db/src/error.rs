//! # Database Error Types
//!
//! Error types for store, interpreter and repository operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (business rule, e.g. Insufficient stock)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds storage failures and lookups             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in api-server) ← Mapped to an HTTP status                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays { "error": message }                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billease_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in its table.
    ///
    /// ## When This Occurs
    /// - `GET /items/:id` for an id that was never inserted
    /// - Updating a row that was deleted meanwhile
    #[error("{entity} not found")]
    NotFound { entity: String, id: String },

    /// The table was never created.
    ///
    /// ## When This Occurs
    /// - Typed operations before schema bootstrap ran
    /// - A misspelled table name in a repository
    #[error("Table '{0}' does not exist")]
    NoSuchTable(String),

    /// Unique column already holds the value.
    ///
    /// ## When This Occurs
    /// - Duplicate category name
    /// - Duplicate item code or employee id
    #[error("{field} '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The largest id in the table is already `i64::MAX`.
    ///
    /// ## When This Occurs
    /// - A row id was raised to the integer limit through `UPDATE`
    #[error("Table '{0}' has no ids left")]
    IdsExhausted(String),

    /// A thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// A business rule or validation refused the write.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// A row could not be built from an input value.
    #[error("Row serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Rejected(CoreError::Validation(err))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_only() {
        let err = DbError::not_found("Item", 42);
        assert_eq!(err.to_string(), "Item not found");
    }

    #[test]
    fn test_validation_error_becomes_rejected() {
        let err: DbError = ValidationError::Required {
            field: "Name".to_string(),
        }
        .into();
        assert!(matches!(err, DbError::Rejected(_)));
        assert_eq!(err.to_string(), "Name is required");
    }
}

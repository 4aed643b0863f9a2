//! # Error Types
//!
//! Domain-specific error types for billease-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billease-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  billease-db errors (separate crate)                                   │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  api-server errors (in app)                                            │
//! │  └── ApiError         - What the client sees ({"error": ...})          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → HTTP         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Messages Are Part of the API
//! The `Display` text of these variants is returned verbatim in the
//! `error` field of HTTP responses, and the web frontend shows it as-is.
//! Changing a message is a breaking change for the UI.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An `out` movement would take the item below zero.
    ///
    /// ## When This Occurs
    /// - `POST /api/invento/transactions` with `type: "out"` and a
    ///   quantity larger than the item's current quantity
    ///
    /// ## User Workflow
    /// ```text
    /// Item "Widget": quantity 10
    ///      │
    ///      ▼
    /// Stock out: 12
    ///      │
    ///      ▼
    /// InsufficientStock { item_id: 1, available: 10, requested: 12 }
    ///      │
    ///      ▼
    /// 400 {"error": "Insufficient stock"}, nothing written
    /// ```
    #[error("Insufficient stock")]
    InsufficientStock {
        item_id: i64,
        available: i64,
        requested: i64,
    },

    /// An `in` movement would push the item quantity past `i64::MAX`.
    #[error("Quantity is too large")]
    QuantityOverflow { item_id: i64, current: i64, added: i64 },

    /// Stock movement type outside `in`/`out`.
    #[error("Type must be \"in\" or \"out\"")]
    InvalidMovementType { given: String },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the `validated()` methods on the module inputs before any
/// row is written.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A single required field is missing or blank.
    ///
    /// `field` is the human label, e.g. `"Item name"` renders
    /// `Item name is required`.
    #[error("{field} is required")]
    Required { field: String },

    /// Several fields are required and at least one is missing.
    ///
    /// With an empty list this renders the short form
    /// `Missing required fields`.
    #[error("{}", missing_fields_message(.fields))]
    MissingFields { fields: Vec<String> },

    /// Value must be a non-negative number.
    #[error("{field} must be a positive number")]
    MustBePositive { field: String },

    /// Amount or quantity above the accepted range, or infinite.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g., email).
    #[error("Invalid {field} format")]
    InvalidFormat { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value in a UNIQUE column.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

fn missing_fields_message(fields: &[String]) -> String {
    if fields.is_empty() {
        "Missing required fields".to_string()
    } else {
        format!("Missing required fields: {}", fields.join(", "))
    }
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
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            item_id: 1,
            available: 10,
            requested: 12,
        };
        assert_eq!(err.to_string(), "Insufficient stock");

        let err = CoreError::QuantityOverflow {
            item_id: 1,
            current: i64::MAX,
            added: 1,
        };
        assert_eq!(err.to_string(), "Quantity is too large");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Warehouse name".to_string(),
        };
        assert_eq!(err.to_string(), "Warehouse name is required");

        let err = ValidationError::MustBePositive {
            field: "Amount".to_string(),
        };
        assert_eq!(err.to_string(), "Amount must be a positive number");

        let err = ValidationError::InvalidFormat {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn test_missing_fields_message_forms() {
        let short = ValidationError::MissingFields { fields: vec![] };
        assert_eq!(short.to_string(), "Missing required fields");

        let long = ValidationError::MissingFields {
            fields: ["type", "description", "amount", "date", "category"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        assert_eq!(
            long.to_string(),
            "Missing required fields: type, description, amount, date, category"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "Name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Name is required");
    }
}

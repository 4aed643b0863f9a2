//! # Validation Module
//!
//! Input validation utilities shared by the module inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React forms)                                       │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde + lenient helpers)                    │
//! │  └── "12" and 12 both accepted for numeric fields                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE, via `Validate::validated()`                     │
//! │  ├── NOT NULL columns → required checks                                │
//! │  ├── CHECK columns → closed vocabularies                               │
//! │  └── email / amount formats                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Repository (billease-db)                                     │
//! │  └── UNIQUE columns (needs the table contents)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billease_core::validation::{validate_email, RequiredFields};
//!
//! let name = Some("Acme".to_string());
//! let amount: Option<f64> = None;
//! let err = RequiredFields::new()
//!     .text("name", &name)
//!     .value("amount", &amount)
//!     .check()
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Missing required fields: amount");
//!
//! assert!(validate_email(Some("a@b.co")).is_ok());
//! assert!(validate_email(Some("nope")).is_err());
//! ```

use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

// =============================================================================
// Validate Trait
// =============================================================================

/// Implemented by every module input.
///
/// `validated` checks the input and returns it with column defaults
/// applied (e.g. `unit = "pcs"`), ready to be written as a row.
pub trait Validate: Sized {
    fn validated(self) -> ValidationResult<Self>;
}

// =============================================================================
// Required Fields
// =============================================================================

/// Collects missing required fields so the error names all of them.
///
/// ## Example
/// ```rust
/// use billease_core::validation::RequiredFields;
///
/// let kind: Option<String> = None;
/// let date = Some("  ".to_string());
/// let err = RequiredFields::new()
///     .text("type", &kind)
///     .text("date", &date)
///     .check()
///     .unwrap_err();
/// assert_eq!(err.to_string(), "Missing required fields: type, date");
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
    short_form: bool,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports only `Missing required fields`, without the field list.
    pub fn short_form(mut self) -> Self {
        self.short_form = true;
        self
    }

    /// Requires a non-blank string.
    pub fn text(mut self, field: &str, value: &Option<String>) -> Self {
        if is_blank(value.as_deref()) {
            self.missing.push(field.to_string());
        }
        self
    }

    /// Requires a present value of any type (zero counts as present).
    pub fn value<T>(mut self, field: &str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.missing.push(field.to_string());
        }
        self
    }

    /// Requires a present, non-zero number.
    pub fn non_zero(mut self, field: &str, value: &Option<i64>) -> Self {
        if matches!(value, None | Some(0)) {
            self.missing.push(field.to_string());
        }
        self
    }

    pub fn check(self) -> ValidationResult<()> {
        if self.missing.is_empty() {
            return Ok(());
        }
        let fields = if self.short_form { Vec::new() } else { self.missing };
        Err(ValidationError::MissingFields { fields })
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// True for `None`, `""` and whitespace-only strings.
#[inline]
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

/// Requires a single non-blank field, returning it trimmed.
///
/// `label` is the human-facing name used in the message
/// (`"Item name"` → `Item name is required`).
pub fn require_text(value: Option<&str>, label: &str) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ValidationError::Required {
            field: label.to_string(),
        }),
    }
}

/// Validates an email address when one is given.
///
/// Blank input passes (email is optional everywhere it appears).
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    match email {
        Some(e) if !e.trim().is_empty() => {
            if EMAIL_RE.is_match(e) {
                Ok(())
            } else {
                Err(ValidationError::InvalidFormat {
                    field: "email".to_string(),
                })
            }
        }
        _ => Ok(()),
    }
}

/// Parses a value from a closed vocabulary (see `types::LedgerType`).
pub fn parse_one_of<T>(value: &str) -> ValidationResult<T>
where
    T: FromStr<Err = ValidationError>,
{
    value.trim().parse()
}

/// Replaces a blank optional string with `default`.
pub fn text_or(value: Option<String>, default: &str) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s),
        _ => Some(default.to_string()),
    }
}

/// Turns blank strings into `None` (stored as `null`).
pub fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Largest accepted amount, in rupees (one lakh crore).
pub const MAX_AMOUNT: f64 = 1e12;

/// Largest accepted stock quantity or capacity.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Rejects NaN, negative, infinite and out-of-range amounts.
///
/// The upper bound keeps every stored amount and any realistic sum of
/// them inside the paise range of [`Money`](crate::Money).
///
/// ## Example
/// ```rust
/// use billease_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("Amount", 0.0).is_ok());
/// assert!(validate_non_negative("Amount", -1.0).is_err());
/// assert!(validate_non_negative("Amount", f64::NAN).is_err());
/// assert!(validate_non_negative("Amount", f64::INFINITY).is_err());
/// assert!(validate_non_negative("Amount", 1e17).is_err());
/// ```
pub fn validate_non_negative(label: &str, value: f64) -> ValidationResult<f64> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: label.to_string(),
        });
    }
    if !value.is_finite() || value > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: label.to_string(),
        });
    }
    Ok(value)
}

/// Integer variant of [`validate_non_negative`], for quantities.
pub fn validate_quantity(label: &str, value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::MustBePositive {
            field: label.to_string(),
        });
    }
    if value > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: label.to_string(),
        });
    }
    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerType;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text(Some("  Acme "), "Name").unwrap(), "Acme");
        let err = require_text(Some("   "), "Name").unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
        assert!(require_text(None, "Name").is_err());
    }

    #[test]
    fn test_required_fields_short_form() {
        let err = RequiredFields::new()
            .short_form()
            .non_zero("quantity", &Some(0))
            .check()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn test_required_fields_passes_when_complete() {
        let name = Some("Widget".to_string());
        assert!(RequiredFields::new()
            .text("name", &name)
            .value("price", &Some(0.0))
            .check()
            .is_ok());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("sales@acme.in")).is_ok());
        assert!(validate_email(Some("sales@acme")).is_err());
        assert!(validate_email(Some("sa les@acme.in")).is_err());
    }

    #[test]
    fn test_parse_one_of() {
        let ledger: LedgerType = parse_one_of(" Asset ").unwrap();
        assert_eq!(ledger, LedgerType::Asset);
        assert!(parse_one_of::<LedgerType>("Cash").is_err());
    }

    #[test]
    fn test_text_defaults() {
        assert_eq!(text_or(None, "pcs").as_deref(), Some("pcs"));
        assert_eq!(text_or(Some("".into()), "pcs").as_deref(), Some("pcs"));
        assert_eq!(text_or(Some("kg".into()), "pcs").as_deref(), Some("kg"));
        assert_eq!(none_if_blank(Some(" ".into())), None);
    }

    #[test]
    fn test_quantity_validation() {
        assert!(validate_quantity("Quantity", 3).is_ok());
        assert_eq!(
            validate_quantity("Quantity", -1).unwrap_err().to_string(),
            "Quantity must be a positive number"
        );
        assert!(validate_quantity("Quantity", MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity("Quantity", i64::MAX).unwrap_err().to_string(),
            "Quantity is too large"
        );
    }

    #[test]
    fn test_amount_bounds() {
        assert_eq!(validate_non_negative("Amount", MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        for huge in [1e17, f64::INFINITY, f64::MAX] {
            assert_eq!(
                validate_non_negative("Amount", huge).unwrap_err(),
                ValidationError::TooLarge {
                    field: "Amount".to_string()
                }
            );
        }
        assert_eq!(
            validate_non_negative("Amount", f64::NEG_INFINITY)
                .unwrap_err()
                .to_string(),
            "Amount must be a positive number"
        );
    }
}

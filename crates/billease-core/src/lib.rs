//! # billease-core: Pure Business Logic for BillEase Suite
//!
//! Domain types, input validation, money arithmetic, payroll math and
//! report computations, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     BillEase Suite Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    POS ── CRM ── Income/Expense ── Invento ── Accounts+         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    api-server (axum)                            │   │
//! │  │    /api/pos, /api/crm, /api/invento, ...                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ billease-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  models   │  │   money   │  │  payroll  │  │ validation│  │   │
//! │  │   │  inputs   │  │   Money   │  │  PF/ESI   │  │   rules   │  │   │
//! │  │   │           │  │   Rate    │  │  TDS      │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  billease-db (Storage Layer)                    │   │
//! │  │        table store, SQL-subset interpreter, repositories        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Closed vocabularies (ledger/party types, stock movement) and summaries
//! - [`money`] - Money type with integer paise arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators and the [`Validate`] trait
//! - [`lenient`] - serde helpers for form-shaped JSON
//! - [`models`] - Input bodies for every module
//! - [`payroll`] - PF, ESI, TDS and payslips
//! - [`reports`] - Trial balance, balance sheet, P&L, sales, aging, HSN, valuation
//!
//! ## Example Usage
//!
//! ```rust
//! use billease_core::models::ItemInput;
//! use billease_core::Validate;
//!
//! let item: ItemInput = serde_json::from_str(r#"{"name": "Widget", "quantity": "10"}"#).unwrap();
//! let item = item.validated().unwrap();
//! assert_eq!(item.unit.as_deref(), Some("pcs"));
//! assert_eq!(item.quantity, Some(10));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lenient;
pub mod models;
pub mod money;
pub mod payroll;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::Validate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Income categories seeded on first start.
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Business", "Investment", "Other"];

/// Expense categories seeded on first start.
pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Utilities",
    "Shopping",
    "Entertainment",
    "Health",
    "Education",
    "Other",
];

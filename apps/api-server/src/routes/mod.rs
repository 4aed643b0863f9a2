//! # Route Modules
//!
//! One router per business module, mounted under `/api`.
//!
//! ```text
//! /api/invento          → inventory.rs
//! /api/income-expense   → income_expense.rs
//! /api/pos              → pos.rs
//! /api/crm              → crm.rs
//! /api/accounts-plus    → accounts_plus.rs
//!   └── /reports        → reports.rs
//! /api/health           → health.rs
//! ```
//!
//! Handlers validate the body, call one repository method and return
//! the row(s) as JSON. Errors convert through [`ApiError`](crate::error::ApiError).

pub mod accounts_plus;
pub mod crm;
pub mod health;
pub mod income_expense;
pub mod inventory;
pub mod pos;
pub mod reports;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// `DELETE` answer; sent whether or not a row matched.
pub fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// `?type=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `?mode=` filter (individual / family).
#[derive(Debug, Default, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

//! # Domain Types
//!
//! Shared vocabulary for the BillEase modules.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │  StockMovement  │   │ TransactionKind │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  In             │   │  Income         │       │
//! │  │  1200 = 12%     │   │  Out            │   │  Expense        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   LedgerType    │   │    PartyType    │   │  Summary types  │       │
//! │  │  Asset ...      │   │  Customer       │   │  FinanceSummary │       │
//! │  │  Equity         │   │  Supplier       │   │  CrmAnalytics   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rows vs Types
//! Stored entities are flat JSON rows (see `billease-db`). The types here
//! cover the closed vocabularies those rows use (`type` columns with a
//! CHECK constraint) and the computed responses built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate in basis points (bps).
///
/// 1 basis point = 0.01%, so the default PF rate of 12% is 1200 bps and
/// the ESI employee rate of 0.75% is 75 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage as stored in rows (`12`, `0.75`).
    /// Negative or non-finite percentages become zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Rate(0);
        }
        Rate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of an inventory transaction (`invento_transactions.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockMovement {
    /// Goods received; adds to the item quantity.
    In,
    /// Goods issued; subtracts from the item quantity.
    Out,
}

impl StockMovement {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockMovement::In => "in",
            StockMovement::Out => "out",
        }
    }

    /// Computes the item quantity after this movement.
    ///
    /// ## Stock Rule
    /// ```text
    /// current = 10, Out 12
    ///      │
    ///      ▼
    /// 10 - 12 = -2 < 0
    ///      │
    ///      ▼
    /// InsufficientStock { available: 10, requested: 12 }
    /// ```
    pub fn apply(&self, item_id: i64, current: i64, quantity: i64) -> Result<i64, CoreError> {
        match self {
            StockMovement::In => {
                current
                    .checked_add(quantity)
                    .ok_or(CoreError::QuantityOverflow {
                        item_id,
                        current,
                        added: quantity,
                    })
            }
            StockMovement::Out => {
                let next = current.checked_sub(quantity).unwrap_or(-1);
                if next < 0 {
                    return Err(CoreError::InsufficientStock {
                        item_id,
                        available: current,
                        requested: quantity,
                    });
                }
                Ok(next)
            }
        }
    }
}

impl FromStr for StockMovement {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(StockMovement::In),
            "out" => Ok(StockMovement::Out),
            other => Err(CoreError::InvalidMovementType {
                given: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StockMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Closed vocabularies
// =============================================================================

/// Generates a string-backed enum with `as_str`, `ALL`, `FromStr`
/// (failing with `ValidationError::NotAllowed`) and `Display`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ValidationError::NotAllowed {
                        field: $field.to_string(),
                        allowed: Self::ALL.iter().map(|v| v.as_str().to_string()).collect(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// `transactions.type` in the Income/Expense module.
    TransactionKind, field = "type" {
        Income => "income",
        Expense => "expense",
    }
}

string_enum! {
    /// `ledgers.type` (CHECK constraint in the Accounts+ schema).
    LedgerType, field = "type" {
        Asset => "Asset",
        Liability => "Liability",
        Income => "Income",
        Expense => "Expense",
        Equity => "Equity",
    }
}

string_enum! {
    /// `parties.type` (CHECK constraint in the Accounts+ schema).
    PartyType, field = "type" {
        Customer => "Customer",
        Supplier => "Supplier",
    }
}

// =============================================================================
// Computed responses
// =============================================================================

/// `GET /api/income-expense/summary`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl FinanceSummary {
    pub fn from_totals(income: crate::Money, expense: crate::Money) -> Self {
        Self {
            total_income: income.to_rupees(),
            total_expense: expense.to_rupees(),
            balance: (income - expense).to_rupees(),
        }
    }
}

/// `GET /api/crm/analytics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CrmAnalytics {
    pub total_customers: u64,
    pub active_customers: u64,
    pub total_leads: u64,
    pub converted_leads: u64,
    /// Sum of `crm_leads.value`, in rupees.
    pub total_value: f64,
    pub pending_activities: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Repository Module
//!
//! Typed access to the table store, one repository per business module.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.inventory().record_movement(input)                         │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── list_items()                                                      │
//! │  ├── get_item(id)                                                      │
//! │  ├── create_item(input)                                                │
//! │  └── record_movement(input)   ← one write section                      │
//! │       │                                                                 │
//! │       │  Tables::insert / find_first / update_first                    │
//! │       ▼                                                                 │
//! │  Store (RwLock<Tables>)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs arrive already validated (`Validate::validated`); repositories
//! add what needs the table contents: lookups, uniqueness, stock rules,
//! timestamps and ordering.
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - Warehouses, items, stock movements, alerts
//! - [`FinanceRepository`] - Transactions, categories, budgets, recurring, family
//! - [`PosRepository`] - Products, entities, sales, payments, quotations
//! - [`CrmRepository`] - Customers, leads, activities, communications
//! - [`AccountsRepository`] - Companies, ledgers, parties, items, heads, employees
//! - [`ReportsRepository`] - Accounts+ reports over ledgers, sales and stock

pub mod accounts;
pub mod crm;
pub mod finance;
pub mod inventory;
pub mod pos;
pub mod reports;

pub use accounts::AccountsRepository;
pub use crm::CrmRepository;
pub use finance::FinanceRepository;
pub use inventory::InventoryRepository;
pub use pos::PosRepository;
pub use reports::ReportsRepository;

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DbError, DbResult};
use crate::row::{by_id, loose_eq, now_timestamp, to_row, Row};
use crate::store::{Store, Tables};

/// Timestamp columns a table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stamps {
    None,
    Created,
    CreatedUpdated,
}

impl Stamps {
    fn on_insert(self, row: &mut Row) {
        let now = now_timestamp();
        if self != Stamps::None {
            row.insert("created_at".to_string(), Value::String(now.clone()));
        }
        if self == Stamps::CreatedUpdated {
            row.insert("updated_at".to_string(), Value::String(now));
        }
    }

    fn on_update(self, row: &mut Row) {
        if self == Stamps::CreatedUpdated {
            row.insert("updated_at".to_string(), Value::String(now_timestamp()));
        }
    }
}

/// A table plus the names used in its errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableSpec {
    pub name: &'static str,
    pub entity: &'static str,
    pub stamps: Stamps,
}

impl TableSpec {
    pub const fn new(name: &'static str, entity: &'static str, stamps: Stamps) -> Self {
        TableSpec { name, entity, stamps }
    }

    /// Serializes `input` and inserts it with timestamps.
    pub fn insert_in<T: Serialize>(&self, tables: &mut Tables, input: &T) -> DbResult<Row> {
        let mut row = to_row(input)?;
        self.stamps.on_insert(&mut row);
        tables.insert(self.name, row)
    }

    pub fn insert<T: Serialize>(&self, store: &Store, input: &T) -> DbResult<Row> {
        store.write(|t| self.insert_in(t, input))
    }

    pub fn get(&self, store: &Store, id: i64) -> DbResult<Row> {
        store
            .find_first(self.name, by_id(id))?
            .ok_or_else(|| DbError::not_found(self.entity, id))
    }

    /// Replaces the columns in `changes`; `NotFound` when the row is gone.
    pub fn update_row(&self, store: &Store, id: i64, mut changes: Row) -> DbResult<Row> {
        self.stamps.on_update(&mut changes);
        store
            .update_first(self.name, by_id(id), changes)?
            .ok_or_else(|| DbError::not_found(self.entity, id))
    }

    pub fn update<T: Serialize>(&self, store: &Store, id: i64, input: &T) -> DbResult<Row> {
        self.update_row(store, id, to_row(input)?)
    }

    pub fn delete(&self, store: &Store, id: i64) -> DbResult<bool> {
        store.delete_first(self.name, by_id(id))
    }

    /// Rows matching every `(field, value)` filter, sorted by `order`.
    pub fn list(
        &self,
        store: &Store,
        filters: &[(&str, Value)],
        order: impl Fn(&Row, &Row) -> Ordering,
    ) -> DbResult<Vec<Row>> {
        let mut rows = store.find_where(self.name, |row| {
            filters
                .iter()
                .all(|(field, value)| loose_eq(row.get(*field), value))
        })?;
        rows.sort_by(order);
        Ok(rows)
    }
}

/// Turns optional query parameters into list filters, skipping blanks.
pub fn filters<'a>(pairs: &[(&'a str, Option<&str>)]) -> Vec<(&'a str, Value)> {
    pairs
        .iter()
        .filter_map(|(field, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (*field, Value::String(v.to_string())))
        })
        .collect()
}

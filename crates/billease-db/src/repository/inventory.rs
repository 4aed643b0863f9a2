//! # Inventory Repository
//!
//! Warehouses, items, stock movements and low-stock alerts for Invento.
//!
//! ## Stock Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record_movement (one write section)                     │
//! │                                                                         │
//! │  input.check()          ← required fields, type in/out, quantity > 0   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find item by id        ← 404 "Item not found"                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  movement.apply(qty)    ← 400 "Insufficient stock" when < 0            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert invento_transactions row                                       │
//! │  update invento_items.quantity + updated_at                            │
//! │                                                                         │
//! │  Nothing is written unless every check passes.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use billease_core::models::{ItemInput, StockMovementInput, WarehouseInput};
use serde_json::Value;
use tracing::{debug, warn};

use super::{filters, Stamps, TableSpec};
use crate::error::{DbError, DbResult};
use crate::row::{asc_by, by_id, desc_by, now_timestamp, number_field, Row};
use crate::store::Store;

const WAREHOUSES: TableSpec = TableSpec::new("warehouses", "Warehouse", Stamps::Created);
const ITEMS: TableSpec = TableSpec::new("invento_items", "Item", Stamps::CreatedUpdated);
const MOVEMENTS: TableSpec =
    TableSpec::new("invento_transactions", "Transaction", Stamps::Created);

/// Repository for Invento tables.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    store: Arc<Store>,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(store: Arc<Store>) -> Self {
        InventoryRepository { store }
    }

    // =========================================================================
    // Warehouses
    // =========================================================================

    pub fn list_warehouses(&self) -> DbResult<Vec<Row>> {
        WAREHOUSES.list(&self.store, &[], |a, b| asc_by(a, b, "name"))
    }

    pub fn create_warehouse(&self, input: &WarehouseInput) -> DbResult<Row> {
        let row = WAREHOUSES.insert(&self.store, input)?;
        debug!(name = ?input.name, "Warehouse created");
        Ok(row)
    }

    pub fn delete_warehouse(&self, id: i64) -> DbResult<bool> {
        WAREHOUSES.delete(&self.store, id)
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub fn list_items(&self) -> DbResult<Vec<Row>> {
        ITEMS.list(&self.store, &[], |a, b| asc_by(a, b, "name"))
    }

    pub fn get_item(&self, id: i64) -> DbResult<Row> {
        ITEMS.get(&self.store, id)
    }

    pub fn create_item(&self, input: &ItemInput) -> DbResult<Row> {
        ITEMS.insert(&self.store, input)
    }

    pub fn update_item(&self, id: i64, input: &ItemInput) -> DbResult<Row> {
        ITEMS.update(&self.store, id, input)
    }

    pub fn delete_item(&self, id: i64) -> DbResult<bool> {
        ITEMS.delete(&self.store, id)
    }

    /// Items at or below their minimum stock, most short first.
    pub fn low_stock_alerts(&self) -> DbResult<Vec<Row>> {
        let shortfall = |row: &Row| number_field(row, "quantity") - number_field(row, "min_stock");
        let mut rows = self.store.find_where(ITEMS.name, |row| shortfall(row) <= 0.0)?;
        rows.sort_by(|a, b| shortfall(a).total_cmp(&shortfall(b)));
        Ok(rows)
    }

    // =========================================================================
    // Stock Movements
    // =========================================================================

    /// Movements, optionally only `in` or `out`, latest date first.
    pub fn list_movements(&self, kind: Option<&str>) -> DbResult<Vec<Row>> {
        MOVEMENTS.list(&self.store, &filters(&[("type", kind)]), |a, b| {
            desc_by(a, b, "date", "created_at")
        })
    }

    /// Records a stock movement and adjusts the item quantity atomically.
    ///
    /// ## Returns
    /// * `Ok(Row)` - The stored `invento_transactions` row
    /// * `Err(DbError::Rejected)` - Missing fields, bad type, insufficient
    ///   stock, or a quantity past the integer range
    /// * `Err(DbError::NotFound)` - Unknown `item_id`
    pub fn record_movement(&self, input: StockMovementInput) -> DbResult<Row> {
        let movement = input.check()?;
        let input = input.normalized();
        let (item_id, quantity) = (input.item_id(), input.quantity());

        self.store.write(|tables| {
            let item = tables
                .find_first(ITEMS.name, by_id(item_id))?
                .ok_or_else(|| DbError::not_found(ITEMS.entity, item_id))?;
            let current = number_field(&item, "quantity") as i64;

            let next = movement.apply(item_id, current, quantity).inspect_err(|e| {
                warn!(item_id, current, quantity, error = %e, "Stock movement rejected");
            })?;

            let row = MOVEMENTS.insert_in(tables, &input)?;

            let mut changes = Row::new();
            changes.insert("quantity".to_string(), Value::from(next));
            changes.insert("updated_at".to_string(), Value::String(now_timestamp()));
            tables.update_first(ITEMS.name, by_id(item_id), changes)?;

            debug!(item_id, movement = %movement, from = current, to = next, "Stock adjusted");
            Ok(row)
        })
    }
}

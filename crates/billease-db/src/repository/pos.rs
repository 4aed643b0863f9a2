//! # POS Repository
//!
//! Products, customer/supplier entities, sales, payments and quotations.
//!
//! ## Document Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    list_sales (one read section)                        │
//! │                                                                         │
//! │  pos_sales rows ──┬──► entity_name ← pos_entities.name (id = entity_id)│
//! │                   │                  null when the entity is gone       │
//! │                   └──► items       ← pos_sale_items (sale_id = id)      │
//! │                                                                         │
//! │  Quotations merge the same way with pos_quotation_items.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Creating a sale or quotation writes the header and every line inside
//! one write section.

use std::sync::Arc;

use billease_core::models::{
    EntityInput, LineItemInput, PaymentInput, ProductInput, QuotationInput, SaleInput,
};
use serde_json::Value;
use tracing::debug;

use super::{filters, Stamps, TableSpec};
use crate::error::DbResult;
use crate::row::{desc_by, field_eq, newest_first, row_id, to_row, Row};
use crate::store::{Store, Tables};

const PRODUCTS: TableSpec = TableSpec::new("pos_products", "Product", Stamps::CreatedUpdated);
const ENTITIES: TableSpec = TableSpec::new("pos_entities", "Entity", Stamps::CreatedUpdated);
const SALES: TableSpec = TableSpec::new("pos_sales", "Sale", Stamps::Created);
const SALE_ITEMS: TableSpec = TableSpec::new("pos_sale_items", "Sale item", Stamps::None);
const PAYMENTS: TableSpec = TableSpec::new("pos_payments", "Payment", Stamps::Created);
const QUOTATIONS: TableSpec = TableSpec::new("pos_quotations", "Quotation", Stamps::Created);
const QUOTATION_ITEMS: TableSpec =
    TableSpec::new("pos_quotation_items", "Quotation item", Stamps::None);

/// Repository for POS tables.
#[derive(Debug, Clone)]
pub struct PosRepository {
    store: Arc<Store>,
}

impl PosRepository {
    /// Creates a new PosRepository.
    pub fn new(store: Arc<Store>) -> Self {
        PosRepository { store }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn list_products(&self) -> DbResult<Vec<Row>> {
        PRODUCTS.list(&self.store, &[], newest_first)
    }

    pub fn create_product(&self, input: &ProductInput) -> DbResult<Row> {
        PRODUCTS.insert(&self.store, input)
    }

    pub fn update_product(&self, id: i64, input: &ProductInput) -> DbResult<Row> {
        PRODUCTS.update(&self.store, id, input)
    }

    pub fn delete_product(&self, id: i64) -> DbResult<bool> {
        PRODUCTS.delete(&self.store, id)
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Customers and suppliers, optionally of one type.
    pub fn list_entities(&self, kind: Option<&str>) -> DbResult<Vec<Row>> {
        ENTITIES.list(&self.store, &filters(&[("type", kind)]), newest_first)
    }

    pub fn create_entity(&self, input: &EntityInput) -> DbResult<Row> {
        ENTITIES.insert(&self.store, input)
    }

    pub fn update_entity(&self, id: i64, input: &EntityInput) -> DbResult<Row> {
        ENTITIES.update(&self.store, id, input)
    }

    pub fn delete_entity(&self, id: i64) -> DbResult<bool> {
        ENTITIES.delete(&self.store, id)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Sales with `entity_name` and `items`, latest date first.
    pub fn list_sales(&self) -> DbResult<Vec<Row>> {
        self.store.read(|tables| {
            let mut sales = tables.find_where(SALES.name, |_| true)?;
            sales.sort_by(|a, b| desc_by(a, b, "date", "created_at"));
            for sale in &mut sales {
                attach_entity_name(tables, sale)?;
                attach_lines(tables, sale, SALE_ITEMS, "sale_id")?;
            }
            Ok(sales)
        })
    }

    /// Stores a sale and its lines atomically; returns the sale with `items`.
    pub fn create_sale(&self, input: &SaleInput) -> DbResult<Row> {
        self.store.write(|tables| {
            let mut sale = SALES.insert_in(tables, input)?;
            let items = insert_lines(tables, &input.items, SALE_ITEMS, "sale_id", row_id(&sale))?;
            debug!(id = row_id(&sale), lines = items.len(), "Sale recorded");
            sale.insert("items".to_string(), Value::Array(items));
            Ok(sale)
        })
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Payments with `entity_name`, latest date first.
    pub fn list_payments(&self) -> DbResult<Vec<Row>> {
        self.store.read(|tables| {
            let mut payments = tables.find_where(PAYMENTS.name, |_| true)?;
            payments.sort_by(|a, b| desc_by(a, b, "date", "created_at"));
            for payment in &mut payments {
                attach_entity_name(tables, payment)?;
            }
            Ok(payments)
        })
    }

    pub fn create_payment(&self, input: &PaymentInput) -> DbResult<Row> {
        PAYMENTS.insert(&self.store, input)
    }

    // =========================================================================
    // Quotations
    // =========================================================================

    /// Quotations with `entity_name` and `items`, latest date first.
    pub fn list_quotations(&self) -> DbResult<Vec<Row>> {
        self.store.read(|tables| {
            let mut quotes = tables.find_where(QUOTATIONS.name, |_| true)?;
            quotes.sort_by(|a, b| desc_by(a, b, "date", "created_at"));
            for quote in &mut quotes {
                attach_entity_name(tables, quote)?;
                attach_lines(tables, quote, QUOTATION_ITEMS, "quotation_id")?;
            }
            Ok(quotes)
        })
    }

    /// Stores a quotation and its lines atomically.
    pub fn create_quotation(&self, input: &QuotationInput) -> DbResult<Row> {
        self.store.write(|tables| {
            let mut quote = QUOTATIONS.insert_in(tables, input)?;
            let items = insert_lines(
                tables,
                &input.items,
                QUOTATION_ITEMS,
                "quotation_id",
                row_id(&quote),
            )?;
            quote.insert("items".to_string(), Value::Array(items));
            Ok(quote)
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub(crate) fn attach_entity_name(tables: &Tables, row: &mut Row) -> DbResult<()> {
    let name = match row.get("entity_id") {
        Some(id) if !id.is_null() => tables
            .find_first(ENTITIES.name, field_eq("id", id))?
            .and_then(|e| e.get("name").cloned())
            .unwrap_or(Value::Null),
        _ => Value::Null,
    };
    row.insert("entity_name".to_string(), name);
    Ok(())
}

pub(crate) fn attach_lines(
    tables: &Tables,
    row: &mut Row,
    lines: TableSpec,
    key: &str,
) -> DbResult<()> {
    let id = Value::from(row_id(row));
    let items = tables
        .find_where(lines.name, field_eq(key, &id))?
        .into_iter()
        .map(Value::Object)
        .collect();
    row.insert("items".to_string(), Value::Array(items));
    Ok(())
}

fn insert_lines(
    tables: &mut Tables,
    lines: &[LineItemInput],
    spec: TableSpec,
    key: &str,
    parent_id: i64,
) -> DbResult<Vec<Value>> {
    lines
        .iter()
        .map(|line| {
            let mut fields = to_row(line)?;
            fields.insert(key.to_string(), Value::from(parent_id));
            tables.insert(spec.name, fields).map(Value::Object)
        })
        .collect()
}

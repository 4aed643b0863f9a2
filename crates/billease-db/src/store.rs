//! # Table Store
//!
//! All BillEase data lives here, in ordered row lists keyed by table
//! name, behind a single lock.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Locking Model                                │
//! │                                                                         │
//! │   GET handlers                 POST/PUT/DELETE handlers                │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  store.read(|t| ...)            store.write(|t| ...)                   │
//! │       │  shared                       │  exclusive                      │
//! │       ▼                               ▼                                 │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │                    RwLock<Tables>                              │     │
//! │  │  invento_items: [row, row, ...]                                │     │
//! │  │  invento_transactions: [row, ...]                              │     │
//! │  │  ...                                                           │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! │  Everything inside one write closure is atomic: a stock movement       │
//! │  inserts its transaction row and updates the item quantity in the      │
//! │  same section.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write closures validate before they mutate; an early `Err` leaves the
//! tables as they were.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{DbError, DbResult};
use crate::row::{row_id, Row};

// =============================================================================
// Tables
// =============================================================================

/// One table: its rows in insertion order plus the DDL it was created with.
#[derive(Debug, Default, Clone)]
pub struct Table {
    rows: Vec<Row>,
    ddl: String,
}

impl Table {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn ddl(&self) -> &str {
        &self.ddl
    }

    fn next_id(&self) -> Option<i64> {
        self.rows.iter().map(row_id).max().unwrap_or(0).checked_add(1)
    }
}

/// The set of tables, as seen inside a read or write section.
#[derive(Debug, Default)]
pub struct Tables {
    tables: HashMap<String, Table>,
}

impl Tables {
    /// Registers an empty table. Returns `false` when it already exists.
    pub fn create(&mut self, name: &str, ddl: &str) -> bool {
        if self.tables.contains_key(name) {
            return false;
        }
        self.tables.insert(
            name.to_string(),
            Table {
                rows: Vec::new(),
                ddl: ddl.to_string(),
            },
        );
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn table(&self, name: &str) -> DbResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::NoSuchTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> DbResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::NoSuchTable(name.to_string()))
    }

    /// Rows of a table, or an empty slice when it does not exist.
    pub fn rows_or_empty(&self, name: &str) -> &[Row] {
        self.tables.get(name).map(Table::rows).unwrap_or(&[])
    }

    /// Appends a row, assigning `id = max(id) + 1`.
    ///
    /// Any `id` in `fields` is ignored.
    pub fn insert(&mut self, name: &str, fields: Row) -> DbResult<Row> {
        let table = self.table_mut(name)?;
        let id = table
            .next_id()
            .ok_or_else(|| DbError::IdsExhausted(name.to_string()))?;

        let mut row = Row::with_capacity(fields.len() + 1);
        row.insert("id".to_string(), Value::from(id));
        row.extend(fields.into_iter().filter(|(k, _)| k != "id"));

        table.rows.push(row.clone());
        debug!(table = %name, id, "Row inserted");
        Ok(row)
    }

    /// All rows matching `predicate`, in table order.
    pub fn find_where(&self, name: &str, predicate: impl Fn(&Row) -> bool) -> DbResult<Vec<Row>> {
        Ok(self
            .table(name)?
            .rows
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    /// First row matching `predicate`.
    pub fn find_first(
        &self,
        name: &str,
        predicate: impl Fn(&Row) -> bool,
    ) -> DbResult<Option<Row>> {
        Ok(self
            .table(name)?
            .rows
            .iter()
            .find(|r| predicate(r))
            .cloned())
    }

    /// Merges `changes` into the first matching row and returns the result.
    ///
    /// `id` is never changed.
    pub fn update_first(
        &mut self,
        name: &str,
        predicate: impl Fn(&Row) -> bool,
        changes: Row,
    ) -> DbResult<Option<Row>> {
        let table = self.table_mut(name)?;
        let Some(row) = table.rows.iter_mut().find(|r| predicate(r)) else {
            return Ok(None);
        };
        for (field, value) in changes {
            if field != "id" {
                row.insert(field, value);
            }
        }
        debug!(table = %name, id = row_id(row), "Row updated");
        Ok(Some(row.clone()))
    }

    /// Removes the first matching row. Returns whether one was removed.
    pub fn delete_first(&mut self, name: &str, predicate: impl Fn(&Row) -> bool) -> DbResult<bool> {
        let table = self.table_mut(name)?;
        match table.rows.iter().position(|r| predicate(r)) {
            Some(index) => {
                let row = table.rows.remove(index);
                debug!(table = %name, id = row_id(&row), "Row deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Raw access for the interpreter, creating the table when missing.
    pub(crate) fn rows_mut_or_create(&mut self, name: &str) -> &mut Vec<Row> {
        &mut self.tables.entry(name.to_string()).or_default().rows
    }

    /// Raw access for the interpreter; `None` when the table is missing.
    pub(crate) fn rows_mut(&mut self, name: &str) -> Option<&mut Vec<Row>> {
        self.tables.get_mut(name).map(|t| &mut t.rows)
    }
}

// =============================================================================
// Store
// =============================================================================

/// The process-wide table store.
///
/// Share it as `Arc<Store>`; every test builds its own.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Runs `f` under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> DbResult<R>) -> DbResult<R> {
        let guard = self.inner.read().map_err(|_| {
            error!("Store lock poisoned (read)");
            DbError::LockPoisoned
        })?;
        f(&guard)
    }

    /// Runs `f` under the exclusive lock. This is the unit of atomicity.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tables) -> DbResult<R>) -> DbResult<R> {
        let mut guard = self.inner.write().map_err(|_| {
            error!("Store lock poisoned (write)");
            DbError::LockPoisoned
        })?;
        f(&mut guard)
    }

    /// Registers an empty table. Returns `true` when newly created.
    pub fn create_table(&self, name: &str, ddl: &str) -> DbResult<bool> {
        self.write(|t| Ok(t.create(name, ddl)))
    }

    pub fn insert_row(&self, table: &str, fields: Row) -> DbResult<Row> {
        self.write(|t| t.insert(table, fields))
    }

    pub fn find_where(&self, table: &str, predicate: impl Fn(&Row) -> bool) -> DbResult<Vec<Row>> {
        self.read(|t| t.find_where(table, predicate))
    }

    pub fn find_first(
        &self,
        table: &str,
        predicate: impl Fn(&Row) -> bool,
    ) -> DbResult<Option<Row>> {
        self.read(|t| t.find_first(table, predicate))
    }

    pub fn update_first(
        &self,
        table: &str,
        predicate: impl Fn(&Row) -> bool,
        changes: Row,
    ) -> DbResult<Option<Row>> {
        self.write(|t| t.update_first(table, predicate, changes))
    }

    pub fn delete_first(&self, table: &str, predicate: impl Fn(&Row) -> bool) -> DbResult<bool> {
        self.write(|t| t.delete_first(table, predicate))
    }

    /// Number of rows in a table.
    pub fn count(&self, table: &str) -> DbResult<usize> {
        self.read(|t| Ok(t.table(table)?.rows().len()))
    }

    /// DDL text a table was created with.
    pub fn schema_of(&self, table: &str) -> DbResult<String> {
        self.read(|t| Ok(t.table(table)?.ddl().to_string()))
    }

    /// Whether the lock is usable; `false` after a poisoning panic.
    pub fn is_healthy(&self) -> bool {
        !self.inner.is_poisoned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{by_id, field_eq};
    use serde_json::json;
    use std::sync::Arc;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn store_with(table: &str) -> Store {
        let store = Store::new();
        store.create_table(table, "CREATE TABLE IF NOT EXISTS t (...)").unwrap();
        store
    }

    #[test]
    fn test_ids_are_max_plus_one() {
        let store = store_with("t");
        assert_eq!(row_id(&store.insert_row("t", row(json!({"a": 1}))).unwrap()), 1);
        assert_eq!(row_id(&store.insert_row("t", row(json!({"a": 2}))).unwrap()), 2);
        store.delete_first("t", by_id(1)).unwrap();
        assert_eq!(row_id(&store.insert_row("t", row(json!({"a": 3}))).unwrap()), 3);
        store.delete_first("t", by_id(3)).unwrap();
        // the highest id was removed, so it is handed out again
        assert_eq!(row_id(&store.insert_row("t", row(json!({"a": 4}))).unwrap()), 3);
    }

    #[test]
    fn test_id_past_integer_limit_is_an_error() {
        let store = store_with("t");
        let err = store
            .write(|t| {
                t.table_mut("t")?.rows.push(row(json!({"id": i64::MAX})));
                t.insert("t", Row::new())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::IdsExhausted(ref t) if t == "t"));
        assert!(store.is_healthy());
    }

    #[test]
    fn test_explicit_id_is_ignored() {
        let store = store_with("t");
        let inserted = store.insert_row("t", row(json!({"id": 99, "a": 1}))).unwrap();
        assert_eq!(row_id(&inserted), 1);
    }

    #[test]
    fn test_unknown_table_is_reported() {
        let store = Store::new();
        let err = store.insert_row("nope", Row::new()).unwrap_err();
        assert!(matches!(err, DbError::NoSuchTable(ref t) if t == "nope"));
        assert!(matches!(
            store.find_where("nope", |_| true),
            Err(DbError::NoSuchTable(_))
        ));
    }

    #[test]
    fn test_create_table_is_idempotent() {
        let store = Store::new();
        assert!(store.create_table("t", "first").unwrap());
        assert!(!store.create_table("t", "second").unwrap());
        assert_eq!(store.schema_of("t").unwrap(), "first");
    }

    #[test]
    fn test_update_and_delete_touch_first_match_only() {
        let store = store_with("t");
        for _ in 0..3 {
            store.insert_row("t", row(json!({"status": "Open"}))).unwrap();
        }
        let status = json!("Open");
        let updated = store
            .update_first("t", field_eq("status", &status), row(json!({"status": "Done", "id": 7})))
            .unwrap()
            .unwrap();
        assert_eq!(row_id(&updated), 1);
        assert_eq!(store.find_where("t", field_eq("status", &status)).unwrap().len(), 2);

        assert!(store.delete_first("t", field_eq("status", &status)).unwrap());
        assert_eq!(store.count("t").unwrap(), 2);
        assert!(!store.delete_first("t", by_id(42)).unwrap());
    }

    #[test]
    fn test_failed_write_section_leaves_tables_untouched() {
        let store = store_with("t");
        let result: DbResult<()> = store.write(|t| {
            t.find_first("t", by_id(1))?
                .ok_or_else(|| DbError::not_found("Row", 1))?;
            t.insert("t", Row::new())?;
            Ok(())
        });
        assert!(matches!(result, Err(DbError::NotFound { .. })));
        assert_eq!(store.count("t").unwrap(), 0);
    }

    #[test]
    fn test_poisoned_lock_is_a_storage_error() {
        let store = Arc::new(store_with("t"));
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _: DbResult<()> = poisoner.write(|_| panic!("boom"));
        })
        .join();

        assert!(!store.is_healthy());
        assert!(matches!(store.count("t"), Err(DbError::LockPoisoned)));
    }

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(store_with("t"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.insert_row("t", Row::new()).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut ids: Vec<i64> = store
            .find_where("t", |_| true)
            .unwrap()
            .iter()
            .map(row_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}

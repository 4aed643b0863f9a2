//! # Schema Bootstrap
//!
//! Creates every BillEase table and seeds the default categories.
//!
//! ## Bootstrap Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  Database::in_memory()                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  exec(DDL) for each table, in module order                             │
//! │       ├── Inventory       warehouses, invento_items, ...               │
//! │       ├── Income/Expense  transactions, *_categories, budgets, ...     │
//! │       ├── CRM             crm_customers, crm_leads, ...                │
//! │       ├── POS             pos_products, pos_entities, pos_sales, ...   │
//! │       └── Accounts+       companies, ledgers, parties, ...             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  seed categories: SELECT ... WHERE name = ?  → missing? INSERT         │
//! │                                                                         │
//! │  Idempotent: a second run creates nothing and inserts nothing.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The DDL text is stored with each table; column types, defaults and
//! `CHECK`/`UNIQUE` clauses are documentation for the store, which does
//! not enforce them. Input validation and the repositories do.

use billease_core::{DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::sql::Interpreter;

// =============================================================================
// Table Definitions
// =============================================================================

/// Every `CREATE TABLE` statement, in bootstrap order.
pub const TABLES: &[&str] = &[
    // ---- Inventory ----------------------------------------------------------
    r"CREATE TABLE IF NOT EXISTS warehouses (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      address TEXT,
      city TEXT,
      state TEXT,
      pincode TEXT,
      capacity INTEGER DEFAULT 0,
      manager TEXT,
      phone TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS invento_items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      sku TEXT,
      quantity INTEGER DEFAULT 0,
      unit TEXT DEFAULT 'pcs',
      location TEXT,
      min_stock INTEGER DEFAULT 0,
      cost REAL DEFAULT 0,
      category TEXT,
      description TEXT,
      hsn_code TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS invento_transactions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      item_id INTEGER NOT NULL,
      type TEXT NOT NULL CHECK(type IN ('in', 'out')),
      quantity INTEGER NOT NULL,
      date TEXT NOT NULL,
      location TEXT,
      notes TEXT,
      reference TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    // ---- Income/Expense -----------------------------------------------------
    r"CREATE TABLE IF NOT EXISTS transactions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
      description TEXT NOT NULL,
      amount REAL NOT NULL,
      date TEXT NOT NULL,
      category TEXT NOT NULL,
      notes TEXT,
      mode TEXT DEFAULT 'individual',
      member_id INTEGER,
      payment_method TEXT DEFAULT 'cash',
      tags TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS income_categories (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL UNIQUE,
      icon TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS expense_categories (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL UNIQUE,
      icon TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS budgets (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      category TEXT NOT NULL,
      amount REAL NOT NULL,
      period TEXT NOT NULL,
      mode TEXT DEFAULT 'individual',
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS recurring_transactions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      type TEXT NOT NULL,
      description TEXT NOT NULL,
      amount REAL NOT NULL,
      category TEXT NOT NULL,
      frequency TEXT NOT NULL,
      start_date TEXT NOT NULL,
      end_date TEXT,
      notes TEXT,
      mode TEXT DEFAULT 'individual',
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS family_members (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      email TEXT,
      role TEXT DEFAULT 'member',
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    // ---- CRM ----------------------------------------------------------------
    r"CREATE TABLE IF NOT EXISTS crm_customers (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      email TEXT,
      phone TEXT,
      address TEXT,
      status TEXT DEFAULT 'Active',
      company TEXT,
      notes TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS crm_leads (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      email TEXT,
      phone TEXT,
      company TEXT,
      source TEXT,
      status TEXT DEFAULT 'New',
      value REAL,
      notes TEXT,
      assigned_to TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS crm_activities (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      customer_id INTEGER,
      lead_id INTEGER,
      type TEXT NOT NULL,
      title TEXT NOT NULL,
      description TEXT,
      date TEXT NOT NULL,
      time TEXT,
      status TEXT DEFAULT 'Pending',
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS crm_communications (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      customer_id INTEGER,
      lead_id INTEGER,
      type TEXT NOT NULL,
      subject TEXT,
      content TEXT NOT NULL,
      date TEXT NOT NULL,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    // ---- POS ----------------------------------------------------------------
    r"CREATE TABLE IF NOT EXISTS pos_products (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      price REAL NOT NULL,
      stock INTEGER DEFAULT 0,
      category TEXT,
      sku TEXT,
      barcode TEXT,
      description TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS pos_entities (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      type TEXT NOT NULL,
      address TEXT,
      city TEXT,
      state TEXT,
      pincode TEXT,
      gstin TEXT,
      contact TEXT,
      email TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS pos_sales (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      invoice_no TEXT NOT NULL,
      date TEXT NOT NULL,
      entity_id INTEGER,
      entity_type TEXT,
      invoice_type TEXT,
      total REAL NOT NULL,
      paid REAL DEFAULT 0,
      balance REAL DEFAULT 0,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS pos_sale_items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      sale_id INTEGER NOT NULL,
      product_id INTEGER,
      product_name TEXT NOT NULL,
      quantity INTEGER NOT NULL,
      price REAL NOT NULL,
      discount REAL DEFAULT 0,
      tax REAL DEFAULT 0,
      total REAL NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS pos_payments (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      receipt_no TEXT NOT NULL,
      date TEXT NOT NULL,
      entity_id INTEGER,
      entity_type TEXT,
      amount REAL NOT NULL,
      payment_mode TEXT,
      reference TEXT,
      notes TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS pos_quotations (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      quote_no TEXT NOT NULL,
      date TEXT NOT NULL,
      entity_id INTEGER,
      entity_type TEXT,
      valid_until TEXT,
      total REAL NOT NULL,
      status TEXT DEFAULT 'Pending',
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS pos_quotation_items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      quotation_id INTEGER NOT NULL,
      product_id INTEGER,
      product_name TEXT NOT NULL,
      quantity INTEGER NOT NULL,
      price REAL NOT NULL,
      discount REAL DEFAULT 0,
      tax REAL DEFAULT 0,
      total REAL NOT NULL
    )",
    // ---- Accounts+ ----------------------------------------------------------
    r"CREATE TABLE IF NOT EXISTS companies (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      address TEXT,
      city TEXT,
      state TEXT,
      pincode TEXT,
      phone TEXT,
      email TEXT,
      website TEXT,
      gstin TEXT,
      pan TEXT,
      business_type TEXT,
      opening_period TEXT,
      accounting_year TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS ledgers (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      type TEXT NOT NULL CHECK(type IN ('Asset', 'Liability', 'Income', 'Expense', 'Equity')),
      opening_balance REAL DEFAULT 0,
      parent_group TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS parties (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      type TEXT NOT NULL CHECK(type IN ('Customer', 'Supplier')),
      address TEXT,
      city TEXT,
      state TEXT,
      pincode TEXT,
      contact TEXT,
      email TEXT,
      gstin TEXT,
      pan TEXT,
      credit_limit REAL DEFAULT 0,
      opening_balance REAL DEFAULT 0,
      classification TEXT,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS items_master (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      code TEXT UNIQUE NOT NULL,
      name TEXT NOT NULL,
      hsn TEXT,
      sac TEXT,
      uom TEXT DEFAULT 'PCS',
      rate REAL DEFAULT 0,
      cost_price REAL DEFAULT 0,
      reorder_level INTEGER DEFAULT 0,
      category TEXT,
      brand TEXT,
      group_name TEXT,
      opening_stock INTEGER DEFAULT 0,
      opening_value REAL DEFAULT 0,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS expense_heads (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      type TEXT DEFAULT 'Expense',
      ledger TEXT,
      recurring BOOLEAN DEFAULT 0,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS income_heads (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      type TEXT DEFAULT 'Income',
      ledger TEXT,
      recurring BOOLEAN DEFAULT 0,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    r"CREATE TABLE IF NOT EXISTS employees (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      employee_id TEXT UNIQUE NOT NULL,
      department TEXT,
      designation TEXT,
      basic_salary REAL DEFAULT 0,
      hra REAL DEFAULT 0,
      transport REAL DEFAULT 0,
      medical REAL DEFAULT 0,
      special REAL DEFAULT 0,
      pf_rate REAL DEFAULT 12,
      esi_rate REAL DEFAULT 0.75,
      total_leaves INTEGER DEFAULT 12,
      leaves_taken INTEGER DEFAULT 0,
      created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
      updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
];

// =============================================================================
// Bootstrap
// =============================================================================

/// What one bootstrap run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub tables_created: usize,
    pub categories_seeded: usize,
}

/// Creates all tables and seeds default categories.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Existing rows are never touched
pub fn bootstrap(sql: &Interpreter) -> DbResult<BootstrapReport> {
    info!("Bootstrapping schema");

    let mut report = BootstrapReport::default();
    for ddl in TABLES {
        if sql.exec(ddl)? {
            report.tables_created += 1;
        }
    }

    report.categories_seeded += seed_categories(sql, "income_categories", DEFAULT_INCOME_CATEGORIES)?;
    report.categories_seeded +=
        seed_categories(sql, "expense_categories", DEFAULT_EXPENSE_CATEGORIES)?;

    info!(
        tables_created = report.tables_created,
        categories_seeded = report.categories_seeded,
        "Schema ready"
    );
    Ok(report)
}

fn seed_categories(sql: &Interpreter, table: &str, names: &[&str]) -> DbResult<usize> {
    let find = sql.prepare(&format!("SELECT * FROM {table} WHERE name = ?"));
    let insert = sql.prepare(&format!(
        "INSERT INTO {table} (name, created_at) VALUES (?, CURRENT_TIMESTAMP)"
    ));

    let mut seeded = 0;
    for name in names {
        let name = Value::from(*name);
        if find.get(std::slice::from_ref(&name))?.is_none() {
            insert.run(&[name])?;
            seeded += 1;
        }
    }
    debug!(table = %table, seeded, "Default categories checked");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use std::sync::Arc;

    #[test]
    fn test_bootstrap_creates_every_table() {
        let store = Arc::new(Store::new());
        let report = bootstrap(&Interpreter::new(Arc::clone(&store))).unwrap();

        assert_eq!(report.tables_created, 27);
        assert_eq!(report.tables_created, TABLES.len());
        for table in ["warehouses", "pos_quotation_items", "employees", "crm_leads"] {
            assert_eq!(store.count(table).unwrap(), 0, "{table} should be empty");
        }
        assert!(store.schema_of("items_master").unwrap().contains("code TEXT UNIQUE NOT NULL"));
    }

    #[test]
    fn test_bootstrap_seeds_categories_once() {
        let store = Arc::new(Store::new());
        let sql = Interpreter::new(Arc::clone(&store));

        let first = bootstrap(&sql).unwrap();
        assert_eq!(first.categories_seeded, 12);

        let second = bootstrap(&sql).unwrap();
        assert_eq!(second, BootstrapReport::default());

        assert_eq!(store.count("income_categories").unwrap(), 4);
        assert_eq!(store.count("expense_categories").unwrap(), 8);
    }

    #[test]
    fn test_seeded_categories_have_timestamps() {
        let store = Arc::new(Store::new());
        let sql = Interpreter::new(Arc::clone(&store));
        bootstrap(&sql).unwrap();

        let salary = sql
            .prepare("SELECT * FROM income_categories WHERE name = ?")
            .get(&[Value::from("Salary")])
            .unwrap()
            .unwrap();
        assert_eq!(salary["id"], 1);
        assert!(salary["created_at"].is_string());
    }
}

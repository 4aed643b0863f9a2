//! # billease-db: Storage Layer for BillEase Suite
//!
//! An in-memory table store, a small SQL-subset interpreter over it, the
//! schema bootstrap and one typed repository per business module.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BillEase Suite Data Flow                           │
//! │                                                                         │
//! │  axum handler (POST /api/invento/transactions)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   billease-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │ (database.rs) │    │ (repository/) │    │  (27 tables) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Arc<Store>    │◄───│ Inventory     │    │ CREATE TABLE │  │   │
//! │  │   │ Interpreter   │    │ Finance, POS  │    │ seed rows    │  │   │
//! │  │   │               │    │ CRM, Accounts │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Store: RwLock<HashMap<table, Vec<Row>>>              │   │
//! │  │            (process memory, gone on restart)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`database`] - The shared handle and repository accessors
//! - [`store`] - Tables, rows and the read/write sections
//! - [`sql`] - Statement interpreter (`all` / `get` / `run`)
//! - [`schema`] - Table definitions and bootstrap
//! - [`row`] - Row helpers: field access, comparisons, ordering
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (inventory, pos, etc.)
//!
//! ## Usage
//!
//! ```rust
//! use billease_core::models::ItemInput;
//! use billease_core::Validate;
//! use billease_db::Database;
//!
//! let db = Database::in_memory().unwrap();
//!
//! let input: ItemInput = serde_json::from_str(r#"{"name": "Widget"}"#).unwrap();
//! let item = db.inventory().create_item(&input.validated().unwrap()).unwrap();
//! assert_eq!(item["id"], 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod database;
pub mod error;
pub mod repository;
pub mod row;
pub mod schema;
pub mod sql;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use database::Database;
pub use error::{DbError, DbResult};
pub use row::Row;
pub use sql::{Interpreter, QueryMode, QueryOutput};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::{
    AccountsRepository, CrmRepository, FinanceRepository, InventoryRepository, PosRepository,
    ReportsRepository,
};
pub use repository::crm::ContactFilter;

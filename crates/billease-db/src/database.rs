//! # Database Handle
//!
//! Owns the shared [`Store`] and hands out repositories.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Startup                                   │
//! │                                                                         │
//! │  api-server main                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::in_memory() ← Create store + bootstrap schema               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │        Arc<Store> (RwLock<Tables>)       │                           │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐       │                           │
//! │  │  │ items  │ │ sales  │ │ leads  │ ...   │  (27 tables)              │
//! │  │  └────────┘ └────────┘ └────────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Cloned into AppState, shared by every handler                  │
//! │       ▼                                                                 │
//! │  db.inventory() / db.pos() / db.crm() ...                              │
//! │  (reads run in parallel, writes are exclusive)                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data lives only as long as the process; each `Database` is isolated.

use std::sync::Arc;

use tracing::info;

use crate::error::DbResult;
use crate::repository::{
    AccountsRepository, CrmRepository, FinanceRepository, InventoryRepository, PosRepository,
    ReportsRepository,
};
use crate::schema::{self, BootstrapReport};
use crate::sql::Interpreter;
use crate::store::Store;

/// Main database handle providing repository access.
///
/// Cloning is cheap; clones share the same tables.
///
/// ## Usage in Handlers
/// ```rust,ignore
/// async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
///     Ok(Json(state.db.inventory().list_items()?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<Store>,
}

impl Database {
    /// Creates a fresh store with every table and the default categories.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Bootstrap failed (only on a poisoned lock)
    pub fn in_memory() -> DbResult<Self> {
        let db = Self::unbootstrapped();
        let report = db.bootstrap()?;
        info!(
            tables = report.tables_created,
            categories = report.categories_seeded,
            "In-memory database ready"
        );
        Ok(db)
    }

    /// Creates an empty store with no tables.
    ///
    /// Every table read fails with `NoSuchTable` until [`Database::bootstrap`] runs.
    pub fn unbootstrapped() -> Self {
        Database {
            store: Arc::new(Store::new()),
        }
    }

    /// Creates missing tables and seeds missing categories.
    ///
    /// Idempotent: a second run reports zero changes.
    pub fn bootstrap(&self) -> DbResult<BootstrapReport> {
        schema::bootstrap(&self.sql())
    }

    /// Returns the shared store.
    ///
    /// Prefer repository methods when available.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Returns a statement interpreter over the same store.
    pub fn sql(&self) -> Interpreter {
        Interpreter::new(Arc::clone(&self.store))
    }

    /// Returns the Invento repository.
    ///
    /// ## Example
    /// ```rust
    /// let db = billease_db::Database::in_memory().unwrap();
    /// assert!(db.inventory().list_items().unwrap().is_empty());
    /// ```
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(Arc::clone(&self.store))
    }

    /// Returns the Income/Expense repository.
    pub fn finance(&self) -> FinanceRepository {
        FinanceRepository::new(Arc::clone(&self.store))
    }

    /// Returns the POS repository.
    pub fn pos(&self) -> PosRepository {
        PosRepository::new(Arc::clone(&self.store))
    }

    /// Returns the CRM repository.
    pub fn crm(&self) -> CrmRepository {
        CrmRepository::new(Arc::clone(&self.store))
    }

    /// Returns the Accounts+ repository.
    pub fn accounts(&self) -> AccountsRepository {
        AccountsRepository::new(Arc::clone(&self.store))
    }

    /// Returns the read-only reports repository.
    pub fn reports(&self) -> ReportsRepository {
        ReportsRepository::new(Arc::clone(&self.store))
    }

    /// Checks if the store is usable.
    ///
    /// ## Returns
    /// * `true` - Lock is healthy
    /// * `false` - A writer panicked while holding the lock
    pub fn health_check(&self) -> bool {
        self.store.is_healthy()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

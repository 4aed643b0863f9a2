//! Shared application state.

use std::sync::Arc;

use billease_db::Database;

use crate::config::ServerConfig;

/// State handed to every handler.
///
/// Built once at startup; `Database` clones share the same store.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

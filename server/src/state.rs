use std::path::PathBuf;

use askdoc_core::db;
use askdoc_core::error::AppError;
use askdoc_core::storage::DocumentStore;
use rusqlite::Connection;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
    pub store: DocumentStore,
}

impl AppState {
    /// Opens a connection for one request. Migrations already ran at
    /// startup, so this is a plain open.
    pub fn open_db(&self) -> Result<Connection, AppError> {
        db::open(&self.db_path)
    }
}

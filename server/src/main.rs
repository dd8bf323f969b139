mod auth;
mod config;
mod routes;
mod state;

use std::fs;
use std::sync::Arc;

use askdoc_core::db;
use askdoc_core::error::AppError;
use askdoc_core::storage::DocumentStore;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("askdoc-server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = ServerConfig::from_env();

    fs::create_dir_all(&config.data_dir).map_err(|e| {
        AppError::new("CONFIG_DATA_DIR_FAILED", "Failed to create data directory")
            .with_details(format!("path={}; err={}", config.data_dir.display(), e))
    })?;

    let db_path = config.data_dir.join("askdoc.sqlite");
    let mut conn = db::open(&db_path)?;
    db::migrate(&mut conn)?;
    drop(conn);
    tracing::info!(db = %db_path.display(), "database ready");

    let store = DocumentStore::open(config.data_dir.clone());
    store.ensure_dirs()?;

    let state = Arc::new(AppState { db_path, store });
    let app = routes::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::new("SERVER_BIND_FAILED", "Failed to bind listener")
            .with_details(format!("addr={addr}; err={e}"))
    })?;
    tracing::info!("askdoc server listening on http://{addr}");

    axum::serve(listener, app).await.map_err(|e| {
        AppError::new("SERVER_FAILED", "HTTP server terminated").with_details(e.to_string())
    })?;

    Ok(())
}

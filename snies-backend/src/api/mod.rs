//! REST surface of the reporting backend.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/software-activities", get(handlers::list_activities))
        .route("/api/software-activities/export", get(handlers::export_activities))
        .route("/api/software-activities/import", post(handlers::import_activities))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(pool: SqlitePool, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!("listening on {addr}");
    axum::serve(listener, router(AppState { pool }))
        .await
        .context("Server error")?;
    Ok(())
}

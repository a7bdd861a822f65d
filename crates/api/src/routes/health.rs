use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
}

/// Full health check: verifies the store answers.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let backend = if state.config().uses_memory_store() {
        "memory"
    } else {
        "postgres"
    };

    match state.catalog().store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "store": backend })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "store": backend,
                    "error": err.to_string(),
                })),
            )
        }
    }
}

/// Lightweight ping, no store check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

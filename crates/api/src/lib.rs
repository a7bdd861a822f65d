//! Media catalog HTTP server library.
//!
//! Exposes configuration, state, error mapping and routes so the binary
//! and the integration tests build the same application.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Router with every route group and the middleware stack applied.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer())
}

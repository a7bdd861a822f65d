use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The admin UI is served from a different origin, so every origin is
/// allowed for the methods the catalog routes use.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

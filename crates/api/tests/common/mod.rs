#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use catalog_api::build_app;
use catalog_api::config::AppConfig;
use catalog_api::state::AppState;
use catalog_core::store::MemoryStore;

/// Build a test `AppConfig` pointing at the in-memory store.
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "memory://".to_string(),
        db_max_connections: 1,
        db_min_connections: 0,
        log_level: "debug".to_string(),
    }
}

/// The production router and middleware over a fresh in-memory store.
///
/// The returned router is cloned per request; clones share the store.
pub fn build_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), test_config());
    build_app(state)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// POST an arbitrary body, with `content_type` when given.
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST and return the created document's id.
pub async fn create(app: &Router, resource: &str, body: Value) -> String {
    let response = post_json(app, &format!("/api/{resource}"), body).await;
    assert_eq!(response.status(), 201, "creating {resource} failed");
    body_json(response).await["id"].as_str().unwrap().to_string()
}

/// Active genre, director, studio and type ids, in that order.
pub async fn seed_references(app: &Router) -> [String; 4] {
    let genre = create(
        app,
        "generos",
        serde_json::json!({ "nombre": "Ciencia ficción", "descripcion": "Speculative fiction", "estado": "activo" }),
    )
    .await;
    let director = create(
        app,
        "directores",
        serde_json::json!({ "nombre": "Fritz Lang", "estado": "activo" }),
    )
    .await;
    let studio = create(
        app,
        "productoras",
        serde_json::json!({
            "nombre": "UFA",
            "descripcion": "Universum Film AG",
            "estado": "activo",
            "slogan": "Films for everyone",
        }),
    )
    .await;
    let media_type = create(
        app,
        "tipos",
        serde_json::json!({ "nombre": "Película", "descripcion": "Feature film", "estado": "activo" }),
    )
    .await;
    [genre, director, studio, media_type]
}

pub fn media_body(refs: &[String; 4], serial: &str, url: &str) -> Value {
    serde_json::json!({
        "serial": serial,
        "titulo": "Metropolis",
        "sinopsis": "A futuristic city divided between workers and planners.",
        "url": url,
        "imagen": "https://example.com/metropolis.jpg",
        "anioEstreno": 1927,
        "generoPrincipal": refs[0],
        "directorPrincipal": refs[1],
        "productora": refs[2],
        "tipo": refs[3],
    })
}

//! CRUD endpoints shared by the five catalog resources.
//!
//! ```text
//! GET    /api/{resource}            list (media with references embedded)
//! POST   /api/{resource}            create
//! GET    /api/{resource}/activos    active entries by name (simple kinds only)
//! GET    /api/{resource}/{id}       get one
//! PUT    /api/{resource}/{id}       update
//! DELETE /api/{resource}/{id}       delete
//! ```

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_core::document::{Document, EntityKind};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult, Operation};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/{resource}", get(list).post(create))
        .route("/api/{resource}/activos", get(list_active))
        .route("/api/{resource}/{id}", get(fetch).put(update).delete(remove))
}

fn resolve_kind(resource: &str) -> ApiResult<EntityKind> {
    resource
        .parse()
        .map_err(|_| ApiError::UnknownResource(resource.to_string()))
}

async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let kind = resolve_kind(&resource)?;
    let docs = state
        .catalog()
        .list(kind)
        .await
        .map_err(ApiError::during(kind, Operation::List))?;
    Ok(Json(docs))
}

async fn list_active(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let kind = resolve_kind(&resource)?;
    if !kind.is_simple() {
        return Err(ApiError::UnknownResource(format!("{resource}/activos")));
    }
    let docs = state
        .catalog()
        .list_active(kind)
        .await
        .map_err(ApiError::during(kind, Operation::List))?;
    Ok(Json(docs))
}

async fn fetch(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<Json<Document>> {
    let kind = resolve_kind(&resource)?;
    let doc = state
        .catalog()
        .get(kind, &id)
        .await
        .map_err(ApiError::during(kind, Operation::Get))?;
    Ok(Json(doc))
}

async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let kind = resolve_kind(&resource)?;
    let Json(body) = body?;
    let doc = state
        .catalog()
        .create(kind, &body)
        .await
        .map_err(ApiError::during(kind, Operation::Create))?;
    Ok((StatusCode::CREATED, Json(doc)))
}

async fn update(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let kind = resolve_kind(&resource)?;
    let Json(body) = body?;
    let doc = state
        .catalog()
        .update(kind, &id, &body)
        .await
        .map_err(ApiError::during(kind, Operation::Update))?;
    Ok(Json(doc))
}

async fn remove(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let kind = resolve_kind(&resource)?;
    state
        .catalog()
        .delete(kind, &id)
        .await
        .map_err(ApiError::during(kind, Operation::Delete))?;
    Ok(Json(json!({ "msg": kind.labels().deleted })))
}

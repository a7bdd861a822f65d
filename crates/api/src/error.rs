use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::catalog::CatalogError;
use catalog_core::document::EntityKind;
use serde_json::json;

/// The handler step that failed, used to word 500 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message for an unexpected failure, e.g. "Error al registrar el género".
    pub fn failure_message(self, kind: EntityKind) -> String {
        let labels = kind.labels();
        match self {
            Operation::List => format!("Error al consultar {}", labels.plural),
            Operation::Get => format!("Error al consultar {}", labels.singular),
            Operation::Create => format!("Error al registrar {}", labels.singular),
            Operation::Update => format!("Error al editar {}", labels.singular),
            Operation::Delete => format!("Error al eliminar {}", labels.singular),
        }
    }
}

/// API error type that maps to the admin UI's JSON error bodies:
/// `{ "errors": [...] }` for field validation, `{ "msg", "error"? }` otherwise.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Body missing, not JSON, or sent without a JSON content type.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("{operation:?} on {kind} failed: {source}")]
    Catalog {
        kind: EntityKind,
        operation: Operation,
        source: CatalogError,
    },
}

impl ApiError {
    /// Attach the failing operation to a catalog error, for use with `map_err`.
    pub fn during(kind: EntityKind, operation: Operation) -> impl FnOnce(CatalogError) -> ApiError {
        move |source| ApiError::Catalog {
            kind,
            operation,
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::UnknownResource(resource) => (
                StatusCode::NOT_FOUND,
                json!({ "msg": format!("Recurso no encontrado: {resource}") }),
            ),
            ApiError::InvalidBody(rejection) => (
                rejection.status(),
                json!({
                    "msg": "Cuerpo de la solicitud inválido",
                    "error": rejection.body_text(),
                }),
            ),
            ApiError::Catalog {
                kind,
                operation,
                source,
            } => match source {
                CatalogError::Validation(violations) => {
                    (StatusCode::BAD_REQUEST, json!({ "errors": violations }))
                }
                CatalogError::InvalidReference { message, .. }
                | CatalogError::Conflict { message, .. } => {
                    (StatusCode::BAD_REQUEST, json!({ "msg": message }))
                }
                CatalogError::NotFound { message, .. } => {
                    (StatusCode::NOT_FOUND, json!({ "msg": message }))
                }
                CatalogError::Unexpected(err) => {
                    tracing::error!(%kind, ?operation, error = %err, "Unexpected store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({
                            "msg": operation.failure_message(kind),
                            "error": err.to_string(),
                        }),
                    )
                }
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::store::StoreError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn failure_messages_use_kind_labels() {
        assert_eq!(
            Operation::Create.failure_message(EntityKind::Genre),
            "Error al registrar el género"
        );
        assert_eq!(
            Operation::List.failure_message(EntityKind::Media),
            "Error al consultar las producciones"
        );
        assert_eq!(
            Operation::Delete.failure_message(EntityKind::Studio),
            "Error al eliminar la productora"
        );
    }

    #[test]
    fn catalog_errors_map_to_statuses() {
        let during = |source: CatalogError| ApiError::during(EntityKind::Media, Operation::Create)(source);

        assert_eq!(status_of(during(CatalogError::Validation(vec![]))), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(during(CatalogError::conflict(EntityKind::Media, "url"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(during(CatalogError::not_found(EntityKind::Media))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(during(CatalogError::Unexpected(StoreError::Malformed("x".into())))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::UnknownResource("peliculas".into())),
            StatusCode::NOT_FOUND
        );
    }
}

use thiserror::Error;

use crate::document::{EntityKind, FieldViolation};
use crate::store::StoreError;

/// Why a catalog operation was rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more fields failed the shape rules. Nothing reached the store.
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<FieldViolation>),

    /// A media reference is missing, malformed, or points at an inactive
    /// document. Only the first failing reference is reported.
    #[error("{message}")]
    InvalidReference {
        field: &'static str,
        message: &'static str,
    },

    #[error("{message}")]
    Conflict {
        field: String,
        message: &'static str,
    },

    #[error("{message}")]
    NotFound {
        kind: EntityKind,
        message: &'static str,
    },

    #[error(transparent)]
    Unexpected(StoreError),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind) -> Self {
        CatalogError::NotFound {
            kind,
            message: kind.labels().not_found,
        }
    }

    pub fn conflict(kind: EntityKind, field: &str) -> Self {
        CatalogError::Conflict {
            field: field.to_string(),
            message: kind.conflict_message(field),
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => CatalogError::not_found(kind),
            StoreError::Conflict { kind, field } => CatalogError::conflict(kind, &field),
            other => CatalogError::Unexpected(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

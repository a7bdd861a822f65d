//! Entity store abstraction.
//!
//! One store holds all five collections. Every backend assigns ids and
//! manages `created_at` / `updated_at` itself through [`clock`], and
//! enforces the per-kind unique fields from [`EntityKind::unique_fields`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::document::{fields, Document, DocumentId, EntityKind, Fields, Status};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} document {id} not found")]
    NotFound { kind: EntityKind, id: DocumentId },

    #[error("{kind} field `{field}` is already in use")]
    Conflict { kind: EntityKind, field: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("malformed stored document: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent id → document mapping for every entity kind.
///
/// Implementations must make each single call atomic. Nothing spanning two
/// calls is: callers that check-then-write rely on the store's own unique
/// enforcement as the last line.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a new document, assigning its id and both timestamps.
    async fn insert(&self, kind: EntityKind, fields: Fields) -> StoreResult<Document>;

    async fn find_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<Document>;

    /// First document matching `filter`, if any.
    async fn find_one(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Merge `patch` into the stored body and refresh `updated_at`. A null
    /// value in `patch` removes that field.
    async fn update_by_id(
        &self,
        kind: EntityKind,
        id: DocumentId,
        patch: Fields,
    ) -> StoreResult<Document>;

    async fn delete_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<()>;

    async fn list(&self, kind: EntityKind, query: &ListQuery) -> StoreResult<Vec<Document>>;

    /// Cheap connectivity check.
    async fn ping(&self) -> StoreResult<()>;

    /// Release connections. The store must not be used afterwards.
    async fn close(&self);
}

/// Field-equality filter with optional id constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    id: Option<DocumentId>,
    excluded_id: Option<DocumentId>,
    conditions: Fields,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match the document with this id.
    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Never match the document with this id.
    pub fn excluding(mut self, id: DocumentId) -> Self {
        self.excluded_id = Some(id);
        self
    }

    pub fn field_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.to_string(), value.into());
        self
    }

    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    pub fn excluded_id(&self) -> Option<DocumentId> {
        self.excluded_id
    }

    pub fn conditions(&self) -> &Fields {
        &self.conditions
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if self.id.is_some_and(|id| id != doc.id) {
            return false;
        }
        if self.excluded_id.is_some_and(|id| id == doc.id) {
            return false;
        }
        self.conditions
            .iter()
            .all(|(field, expected)| doc.fields.get(field) == Some(expected))
    }
}

/// What `list` returns and in which order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    /// Sort ascending by this string field; otherwise order is unspecified.
    pub sort_by: Option<&'static str>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Active simple entities, by name ascending.
    pub fn active_by_name() -> Self {
        Self {
            filter: Filter::new().field_eq(fields::STATUS, Status::Active.as_str()),
            sort_by: Some(fields::NAME),
        }
    }
}

/// Timestamp policy shared by every backend.
pub mod clock {
    use chrono::{DateTime, Duration, SubsecRound, Utc};

    /// Current time at the storage resolution (microseconds).
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    /// Next `updated_at` after `previous`: now, but always strictly later
    /// than what was stored.
    pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = now();
        if now > previous {
            now
        } else {
            previous + Duration::microseconds(1)
        }
    }
}

//! CRUD pipeline for every entity kind.
//!
//! Writes run field validation first, then (for media) the reference
//! validator, then the uniqueness guard, and only then touch the store.
//! Reads of media replace the four reference ids with the referenced
//! documents, or `null` where a reference no longer resolves.

pub mod error;
pub mod references;
pub mod uniqueness;


use std::sync::Arc;

use serde_json::Value;

pub use error::{CatalogError, CatalogResult};
pub use references::ReferenceValidator;
pub use uniqueness::UniquenessGuard;

use crate::document::{
    validate_fields, Document, DocumentId, EntityKind, EntityRef, WriteMode, MEDIA_REFERENCES,
};
use crate::store::{EntityStore, ListQuery, StoreError};

/// Catalog service over an injected store handle. Cheap to clone.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn EntityStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub async fn list(&self, kind: EntityKind) -> CatalogResult<Vec<Document>> {
        let docs = self.store.list(kind, &ListQuery::all()).await?;
        self.resolve_all(kind, docs).await
    }

    /// Active documents of a simple kind, by name ascending.
    pub async fn list_active(&self, kind: EntityKind) -> CatalogResult<Vec<Document>> {
        Ok(self.store.list(kind, &ListQuery::active_by_name()).await?)
    }

    pub async fn get(&self, kind: EntityKind, id: &str) -> CatalogResult<Document> {
        let id = parse_id(kind, id)?;
        let doc = self.store.find_by_id(kind, id).await?;
        if kind == EntityKind::Media {
            self.resolve_references(doc).await
        } else {
            Ok(doc)
        }
    }

    pub async fn create(&self, kind: EntityKind, body: &Value) -> CatalogResult<Document> {
        let fields =
            validate_fields(kind, body, WriteMode::Create).map_err(CatalogError::Validation)?;

        if kind == EntityKind::Media {
            ReferenceValidator::new(self.store()).check(&fields).await?;
        }
        UniquenessGuard::new(self.store())
            .ensure_unique(kind, &fields, None)
            .await?;

        let doc = self.store.insert(kind, fields).await?;
        tracing::info!(%kind, id = %doc.id, "document created");
        Ok(doc)
    }

    /// Replace the writable fields of a document. An omitted `estado` keeps
    /// the stored status; an optional field sent as null or blank is removed.
    ///
    /// Simple kinds get no application-level name check here; their name
    /// uniqueness on update comes from the store alone. Media excludes
    /// itself from the serial/url checks.
    pub async fn update(&self, kind: EntityKind, id: &str, body: &Value) -> CatalogResult<Document> {
        let fields =
            validate_fields(kind, body, WriteMode::Update).map_err(CatalogError::Validation)?;
        let id = parse_id(kind, id)?;

        if kind == EntityKind::Media {
            ReferenceValidator::new(self.store()).check(&fields).await?;
            UniquenessGuard::new(self.store())
                .ensure_unique(kind, &fields, Some(id))
                .await?;
        }

        let doc = self.store.update_by_id(kind, id, fields).await?;
        tracing::info!(%kind, %id, "document updated");
        Ok(doc)
    }

    /// Erase a document. Media pointing at it keep the stale id.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> CatalogResult<()> {
        let id = parse_id(kind, id)?;
        self.store.delete_by_id(kind, id).await?;
        tracing::info!(%kind, %id, "document deleted");
        Ok(())
    }

    async fn resolve_all(&self, kind: EntityKind, docs: Vec<Document>) -> CatalogResult<Vec<Document>> {
        if kind != EntityKind::Media {
            return Ok(docs);
        }
        let mut resolved = Vec::with_capacity(docs.len());
        for doc in docs {
            resolved.push(self.resolve_references(doc).await?);
        }
        Ok(resolved)
    }

    /// Embed the referenced documents in place of their ids.
    async fn resolve_references(&self, mut doc: Document) -> CatalogResult<Document> {
        for (field, kind) in MEDIA_REFERENCES {
            let reference = doc.get_str(field).and_then(|raw| EntityRef::parse(kind, raw));
            let embedded = match reference {
                Some(reference) => self.fetch_embedded(reference).await?,
                None => Value::Null,
            };
            doc.fields.insert(field.to_string(), embedded);
        }
        Ok(doc)
    }

    async fn fetch_embedded(&self, reference: EntityRef) -> CatalogResult<Value> {
        match self.store.find_by_id(reference.kind, reference.id).await {
            Ok(target) => serde_json::to_value(&target)
                .map_err(|e| CatalogError::Unexpected(StoreError::Malformed(e.to_string()))),
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(%reference, "dangling media reference");
                Ok(Value::Null)
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// Ids that cannot name a document are reported the same as absent ones.
fn parse_id(kind: EntityKind, raw: &str) -> CatalogResult<DocumentId> {
    DocumentId::parse(raw).ok_or_else(|| CatalogError::not_found(kind))
}

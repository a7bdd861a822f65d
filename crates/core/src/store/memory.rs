use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{clock, EntityStore, Filter, ListQuery, StoreError, StoreResult};
use crate::document::{Document, DocumentId, EntityKind, Fields};

type Collection = BTreeMap<DocumentId, Document>;

/// Process-local store. Used by tests and by `memory://` deployments.
///
/// Writes take the collection lock, so the unique-field check and the
/// write it guards happen together.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<EntityKind, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// First unique field of `kind` whose value in `body` is already held by a
/// document other than `own_id`.
fn taken_field(
    kind: EntityKind,
    collection: &Collection,
    body: &Fields,
    own_id: Option<DocumentId>,
) -> Option<&'static str> {
    kind.unique_fields().iter().copied().find(|field| {
        let Some(value) = body.get(*field) else {
            return false;
        };
        collection
            .values()
            .any(|doc| Some(doc.id) != own_id && doc.fields.get(*field) == Some(value))
    })
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert(&self, kind: EntityKind, fields: Fields) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();

        if let Some(field) = taken_field(kind, collection, &fields, None) {
            return Err(StoreError::Conflict {
                kind,
                field: field.to_string(),
            });
        }

        let now = clock::now();
        let doc = Document {
            id: DocumentId::generate(),
            kind,
            fields,
            created_at: now,
            updated_at: now,
        };
        collection.insert(doc.id, doc.clone());
        tracing::debug!(%kind, id = %doc.id, "memory store insert");
        Ok(doc)
    }

    async fn find_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<Document> {
        self.collections
            .read()
            .await
            .get(&kind)
            .and_then(|collection| collection.get(&id))
            .cloned()
            .ok_or(StoreError::NotFound { kind, id })
    }

    async fn find_one(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .and_then(|collection| collection.values().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn update_by_id(
        &self,
        kind: EntityKind,
        id: DocumentId,
        patch: Fields,
    ) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();

        let Some(existing) = collection.get(&id) else {
            return Err(StoreError::NotFound { kind, id });
        };

        let mut merged = existing.fields.clone();
        merged.extend(patch);
        merged.retain(|_, value| !value.is_null());

        if let Some(field) = taken_field(kind, collection, &merged, Some(id)) {
            return Err(StoreError::Conflict {
                kind,
                field: field.to_string(),
            });
        }

        let doc = collection
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind, id })?;
        doc.fields = merged;
        doc.updated_at = clock::touch(doc.updated_at);
        tracing::debug!(%kind, %id, "memory store update");
        Ok(doc.clone())
    }

    async fn delete_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<()> {
        let removed = self
            .collections
            .write()
            .await
            .get_mut(&kind)
            .and_then(|collection| collection.remove(&id));
        match removed {
            Some(_) => {
                tracing::debug!(%kind, %id, "memory store delete");
                Ok(())
            }
            None => Err(StoreError::NotFound { kind, id }),
        }
    }

    async fn list(&self, kind: EntityKind, query: &ListQuery) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(&kind)
            .map(|collection| {
                collection
                    .values()
                    .filter(|doc| query.filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(field) = query.sort_by {
            docs.sort_by(|a, b| a.get_str(field).cmp(&b.get_str(field)));
        }
        Ok(docs)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        self.collections.write().await.clear();
    }
}

use super::error::{CatalogError, CatalogResult};
use crate::document::{DocumentId, EntityKind, Fields};
use crate::store::{EntityStore, Filter};

/// Rejects writes whose unique fields are already held by another document.
pub struct UniquenessGuard<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> UniquenessGuard<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Check each unique field of `kind` present in `body`, in declaration
    /// order. `exclude` is the document being updated, if any.
    pub async fn ensure_unique(
        &self,
        kind: EntityKind,
        body: &Fields,
        exclude: Option<DocumentId>,
    ) -> CatalogResult<()> {
        for field in kind.unique_fields().iter().copied() {
            let Some(value) = body.get(field) else {
                continue;
            };

            let mut filter = Filter::new().field_eq(field, value.clone());
            if let Some(id) = exclude {
                filter = filter.excluding(id);
            }

            if let Some(holder) = self.store.find_one(kind, &filter).await? {
                tracing::debug!(%kind, field, holder = %holder.id, "unique field taken");
                return Err(CatalogError::conflict(kind, field));
            }
        }
        Ok(())
    }
}

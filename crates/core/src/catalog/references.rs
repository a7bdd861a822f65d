use serde_json::Value;

use super::error::{CatalogError, CatalogResult};
use crate::document::{fields, EntityRef, Fields, Status, MEDIA_REFERENCES};
use crate::store::{EntityStore, Filter};

/// Checks that every foreign key of a media write names an existing,
/// active document.
pub struct ReferenceValidator<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> ReferenceValidator<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Check genre, director, studio and type, in that order, stopping at
    /// the first that does not resolve to an active document.
    pub async fn check(&self, body: &Fields) -> CatalogResult<()> {
        for (field, kind) in MEDIA_REFERENCES {
            let reference = body
                .get(field)
                .and_then(Value::as_str)
                .and_then(|raw| EntityRef::parse(kind, raw));

            let resolved = match reference {
                Some(reference) => self.is_active(reference).await?,
                None => false,
            };

            if !resolved {
                tracing::debug!(field, %kind, "media reference rejected");
                let labels = kind.labels();
                return Err(CatalogError::InvalidReference {
                    field,
                    message: labels.invalid_reference.unwrap_or(labels.not_found),
                });
            }
        }
        Ok(())
    }

    async fn is_active(&self, reference: EntityRef) -> CatalogResult<bool> {
        let filter = Filter::new()
            .with_id(reference.id)
            .field_eq(fields::STATUS, Status::Active.as_str());
        Ok(self.store.find_one(reference.kind, &filter).await?.is_some())
    }
}

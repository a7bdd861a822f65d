use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{clock, EntityStore, Filter, ListQuery, StoreError, StoreResult};
use crate::document::{fields, Document, DocumentId, EntityKind, Fields};

/// Column list shared across queries.
const COLUMNS: &str = "id, content, created_at, updated_at";

/// PostgreSQL-backed store. Every collection lives in the `documents`
/// table, keyed by `collection`, with the body in a JSONB column.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Database row representation of a document.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    content: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, kind: EntityKind) -> StoreResult<Document> {
        let Value::Object(fields) = self.content else {
            return Err(StoreError::Malformed(format!(
                "{kind} document {} has a non-object body",
                self.id
            )));
        };
        Ok(Document {
            id: DocumentId::from(self.id),
            kind,
            fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PgStore {
    /// Open a connection pool. Fails if the database cannot be reached.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Apply the bundled schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique index name to the field it guards.
fn constraint_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_documents_nombre" => Some(fields::NAME),
        "uq_documents_serial" => Some(fields::SERIAL),
        "uq_documents_url" => Some(fields::URL),
        _ => None,
    }
}

/// Turn unique violations (SQLSTATE 23505) on the `uq_documents_*` indexes
/// into [`StoreError::Conflict`]; pass everything else through.
fn classify(kind: EntityKind, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(field) = db_err.constraint().and_then(constraint_field) {
                return StoreError::Conflict {
                    kind,
                    field: field.to_string(),
                };
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl EntityStore for PgStore {
    async fn insert(&self, kind: EntityKind, fields: Fields) -> StoreResult<Document> {
        let query = format!(
            "INSERT INTO documents (id, collection, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(DocumentId::generate().as_uuid())
            .bind(kind.collection())
            .bind(Value::Object(fields))
            .bind(clock::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(kind, e))?;
        tracing::debug!(%kind, id = %row.id, "document inserted");
        row.into_document(kind)
    }

    async fn find_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<Document> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = $2");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(kind.collection())
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { kind, id })?
            .into_document(kind)
    }

    async fn find_one(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Document>> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE collection = $1
               AND content @> $2
               AND ($3::uuid IS NULL OR id = $3)
               AND ($4::uuid IS NULL OR id <> $4)
             LIMIT 1"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(kind.collection())
            .bind(Value::Object(filter.conditions().clone()))
            .bind(filter.id().map(|id| id.as_uuid()))
            .bind(filter.excluded_id().map(|id| id.as_uuid()))
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_document(kind))
            .transpose()
    }

    async fn update_by_id(
        &self,
        kind: EntityKind,
        id: DocumentId,
        patch: Fields,
    ) -> StoreResult<Document> {
        // Same rule as clock::touch, evaluated against the stored row.
        let query = format!(
            "UPDATE documents SET
                content = jsonb_strip_nulls(content || $3),
                updated_at = GREATEST($4, updated_at + INTERVAL '1 microsecond')
             WHERE collection = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(kind.collection())
            .bind(id.as_uuid())
            .bind(Value::Object(patch))
            .bind(clock::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(kind, e))?
            .ok_or(StoreError::NotFound { kind, id })?;
        tracing::debug!(%kind, %id, "document updated");
        row.into_document(kind)
    }

    async fn delete_by_id(&self, kind: EntityKind, id: DocumentId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(kind.collection())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { kind, id });
        }
        tracing::debug!(%kind, %id, "document deleted");
        Ok(())
    }

    async fn list(&self, kind: EntityKind, query: &ListQuery) -> StoreResult<Vec<Document>> {
        let order = match query.sort_by {
            Some(_) => "content ->> $3 COLLATE \"C\" ASC, created_at ASC",
            None => "created_at ASC, id ASC",
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE collection = $1 AND content @> $2
             ORDER BY {order}"
        );
        let mut rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(kind.collection())
            .bind(Value::Object(query.filter.conditions().clone()));
        if let Some(field) = query.sort_by {
            rows = rows.bind(field);
        }
        rows.fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.into_document(kind))
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

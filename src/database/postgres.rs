use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use sqlx::{FromRow, PgPool};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::store::{
    into_object, ChangeEvent, ChangeKind, Document, DocumentQuery, DocumentStore, StoreResult,
    CHANGE_FEED_BUFFER,
};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: JsonValue,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// JSONB-backed collections in a single `documents` table.
///
/// The change feed only reports writes made through this instance.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_BUFFER);
        Self { pool, changes }
    }

    fn publish(&self, collection: &str, kind: ChangeKind, id: &str, document: Option<Document>) {
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
            kind,
            id: id.to_string(),
            document,
        });
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, data: JsonValue) -> StoreResult<Document> {
        let data = JsonValue::Object(into_object(data)?);
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(Uuid::new_v4().to_string())
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        let document = Document::from(row);
        self.publish(collection, ChangeKind::Created, &document.id, Some(document.clone()));
        Ok(document)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, JsonValue>,
    ) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(JsonValue::Object(patch))
        .fetch_optional(&self.pool)
        .await?;

        let document = row.map(Document::from);
        if let Some(doc) = &document {
            self.publish(collection, ChangeKind::Updated, id, Some(doc.clone()));
        }
        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = res.rows_affected() > 0;
        if removed {
            self.publish(collection, ChangeKind::Deleted, id, None);
        }
        Ok(removed)
    }

    async fn find(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND data @> $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(collection)
        .bind(JsonValue::Object(query.filter.clone()))
        .bind(query.limit)
        .bind(query.offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn count(&self, collection: &str, query: &DocumentQuery) -> StoreResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND data @> $2",
        )
        .bind(collection)
        .bind(JsonValue::Object(query.filter.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

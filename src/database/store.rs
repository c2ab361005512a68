use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::broadcast;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub const CHANGE_FEED_BUFFER: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// A stored JSON object plus the metadata the store owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equality filters over top-level fields, newest first.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub filter: Map<String, JsonValue>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<JsonValue>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn eq_opt(self, field: &str, value: Option<impl Into<JsonValue>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn page(mut self, page: i64, per_page: i64) -> Self {
        self.limit = Some(per_page);
        self.offset = page.saturating_sub(1).max(0).saturating_mul(per_page.max(0));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, data: &JsonValue) -> bool {
        self.filter
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub kind: ChangeKind,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, data: JsonValue) -> StoreResult<Document>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Shallow merge of `patch` into the stored object.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, JsonValue>,
    ) -> StoreResult<Option<Document>>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    async fn find(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>>;

    async fn count(&self, collection: &str, query: &DocumentQuery) -> StoreResult<i64>;

    /// Push feed of every write made through this store.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub(crate) fn into_object(data: JsonValue) -> StoreResult<Map<String, JsonValue>> {
    match data {
        JsonValue::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

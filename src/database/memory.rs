use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::store::{
    into_object, ChangeEvent, ChangeKind, Document, DocumentQuery, DocumentStore, StoreResult,
    CHANGE_FEED_BUFFER,
};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    document: Document,
}

#[derive(Debug, Default)]
struct Collections {
    next_seq: u64,
    items: HashMap<String, HashMap<String, Entry>>,
}

/// Process-local store used for tests and local development without Postgres.
pub struct MemoryDocumentStore {
    inner: RwLock<Collections>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_BUFFER);
        Self {
            inner: RwLock::new(Collections::default()),
            changes,
        }
    }

    fn publish(&self, collection: &str, kind: ChangeKind, id: &str, document: Option<Document>) {
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
            kind,
            id: id.to_string(),
            document,
        });
    }

    fn sorted_matches(
        entries: Option<&HashMap<String, Entry>>,
        query: &DocumentQuery,
    ) -> Vec<Entry> {
        let mut matched: Vec<Entry> = entries
            .map(|items| {
                items
                    .values()
                    .filter(|entry| query.matches(&entry.document.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matched.sort_by(|a, b| b.seq.cmp(&a.seq));
        matched
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, data: JsonValue) -> StoreResult<Document> {
        let data = JsonValue::Object(into_object(data)?);
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };

        {
            let mut guard = self.inner.write().await;
            guard.next_seq += 1;
            let seq = guard.next_seq;
            guard
                .items
                .entry(collection.to_string())
                .or_default()
                .insert(
                    document.id.clone(),
                    Entry {
                        seq,
                        document: document.clone(),
                    },
                );
        }

        self.publish(collection, ChangeKind::Created, &document.id, Some(document.clone()));
        Ok(document)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let guard = self.inner.read().await;
        Ok(guard
            .items
            .get(collection)
            .and_then(|items| items.get(id))
            .map(|entry| entry.document.clone()))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, JsonValue>,
    ) -> StoreResult<Option<Document>> {
        let updated = {
            let mut guard = self.inner.write().await;
            let Some(entry) = guard
                .items
                .get_mut(collection)
                .and_then(|items| items.get_mut(id))
            else {
                return Ok(None);
            };
            if let JsonValue::Object(map) = &mut entry.document.data {
                for (key, value) in patch {
                    map.insert(key, value);
                }
            }
            entry.document.updated_at = Utc::now();
            entry.document.clone()
        };

        self.publish(collection, ChangeKind::Updated, id, Some(updated.clone()));
        Ok(Some(updated))
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let removed = {
            let mut guard = self.inner.write().await;
            guard
                .items
                .get_mut(collection)
                .and_then(|items| items.remove(id))
                .is_some()
        };
        if removed {
            self.publish(collection, ChangeKind::Deleted, id, None);
        }
        Ok(removed)
    }

    async fn find(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        let guard = self.inner.read().await;
        let offset = query.offset.max(0) as usize;
        let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(Self::sorted_matches(guard.items.get(collection), query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|entry| entry.document)
            .collect())
    }

    async fn count(&self, collection: &str, query: &DocumentQuery) -> StoreResult<i64> {
        let guard = self.inner.read().await;
        let total = guard
            .items
            .get(collection)
            .map(|items| {
                items
                    .values()
                    .filter(|entry| query.matches(&entry.document.data))
                    .count()
            })
            .unwrap_or(0);
        Ok(total as i64)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

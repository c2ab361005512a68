use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::store::{Document, DocumentQuery, DocumentStore};
use crate::error::{Error, Result};

/// A stored entity as returned by the API: its fields next to the store metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<Record<T>>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Typed view over one named collection of the document store.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    pub async fn insert(&self, value: &T) -> Result<Record<T>> {
        let doc = self
            .store
            .insert(self.name, serde_json::to_value(value)?)
            .await?;
        self.decode(doc)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Record<T>>> {
        match self.store.get(self.name, id).await? {
            Some(doc) => Ok(Some(self.decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn require(&self, id: &str, not_found: &str) -> Result<Record<T>> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(not_found.to_string()))
    }

    pub async fn patch(&self, id: &str, patch: Map<String, JsonValue>) -> Result<Option<Record<T>>> {
        match self.store.update(self.name, id, patch).await? {
            Some(doc) => Ok(Some(self.decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.store.delete(self.name, id).await?)
    }

    pub async fn find(&self, query: &DocumentQuery) -> Result<Vec<Record<T>>> {
        self.store
            .find(self.name, query)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect()
    }

    pub async fn count(&self, query: &DocumentQuery) -> Result<i64> {
        Ok(self.store.count(self.name, query).await?)
    }

    pub async fn page(&self, query: DocumentQuery, page: Option<i64>, per_page: Option<i64>) -> Result<Page<T>> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(20).clamp(1, 100);
        let total = self.count(&query).await?;
        let items = self.find(&query.page(page, per_page)).await?;
        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(Page {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    fn decode(&self, doc: Document) -> Result<Record<T>> {
        let data = serde_json::from_value(doc.data).map_err(|e| {
            Error::Internal(format!("Malformed document {} in {}: {}", doc.id, self.name, e))
        })?;
        Ok(Record {
            id: doc.id,
            data,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// Serializes a partial update, keeping only the fields it sets.
pub fn to_patch<P: Serialize>(changes: &P) -> Result<Map<String, JsonValue>> {
    match serde_json::to_value(changes)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(Error::Internal("Patch must serialize to an object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDocumentStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        #[serde(default)]
        pinned: bool,
    }

    #[tokio::test]
    async fn record_flattens_entity_next_to_metadata() {
        let notes: Collection<Note> = Collection::new(Arc::new(MemoryDocumentStore::new()), "notes");
        let record = notes
            .insert(&Note {
                title: "Inventario".into(),
                pinned: false,
            })
            .await
            .unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(record.id));
        assert_eq!(value["title"], "Inventario");
        assert!(value.get("data").is_none());
    }

    #[tokio::test]
    async fn page_reports_totals() {
        let notes: Collection<Note> = Collection::new(Arc::new(MemoryDocumentStore::new()), "notes");
        for n in 0..7 {
            notes
                .insert(&Note {
                    title: format!("n{}", n),
                    pinned: n < 3,
                })
                .await
                .unwrap();
        }
        let page = notes
            .page(DocumentQuery::new(), Some(2), Some(5))
            .await
            .unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);

        let pinned = notes
            .count(&DocumentQuery::new().eq("pinned", true))
            .await
            .unwrap();
        assert_eq!(pinned, 3);
    }

    #[test]
    fn to_patch_skips_unset_fields() {
        #[derive(Serialize)]
        struct Changes {
            #[serde(skip_serializing_if = "Option::is_none")]
            title: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pinned: Option<bool>,
        }
        let patch = to_patch(&Changes {
            title: None,
            pinned: Some(true),
        })
        .unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["pinned"], json!(true));
    }
}

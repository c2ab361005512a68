use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};
use tracing::info;
use validator::Validate;

use crate::database::collection::{to_patch, Collection, Record};
use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::catalog_dto::CatalogListQuery;
use crate::error::{Error, Result};
use crate::models::catalog::CatalogEntity;
use crate::services::activity_service::ActivityService;
use crate::utils::request_meta::ClientInfo;

pub const MAX_LIST_LIMIT: i64 = 100;

/// Public reads and editor writes for one catalog collection.
/// Reads fall back to built-in data when no store is configured.
pub struct CatalogService<T: CatalogEntity> {
    store: Option<Arc<dyn DocumentStore>>,
    records: Option<Collection<T>>,
}

impl<T> CatalogService<T>
where
    T: CatalogEntity + Clone,
{
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        let records = store
            .clone()
            .map(|store| Collection::new(store, T::COLLECTION));
        Self { store, records }
    }

    pub async fn list(&self, query: &CatalogListQuery) -> Result<Vec<Record<T>>> {
        let limit = query.limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let Some(records) = &self.records else {
            return Ok(fallback_records::<T>(query.featured, limit));
        };
        let filter = DocumentQuery::new()
            .eq("active", true)
            .eq_opt("featured", query.featured)
            .limit(limit);
        records.find(&filter).await
    }

    /// Any record by id, inactive ones included.
    pub async fn get(&self, id: &str) -> Result<Record<T>> {
        match &self.records {
            Some(records) => records.require(id, T::NOT_FOUND).await,
            None => fallback_records::<T>(None, MAX_LIST_LIMIT)
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| Error::NotFound(T::NOT_FOUND.into())),
        }
    }

    pub async fn create(&self, payload: T::Payload, actor: &str, client: &ClientInfo) -> Result<Record<T>> {
        let records = self.records()?;
        payload.validate()?;
        let entity = T::from_payload(payload)?;
        let record = records.insert(&entity).await?;
        info!(collection = T::COLLECTION, id = %record.id, actor, "catalog record created");
        self.log(actor, "created", &record.id, None, client).await;
        Ok(record)
    }

    /// Partial update: only fields present in the payload change, and the
    /// merged record must still pass the entity checks.
    pub async fn update(
        &self,
        id: &str,
        payload: T::Payload,
        actor: &str,
        client: &ClientInfo,
    ) -> Result<Record<T>> {
        let records = self.records()?;
        payload.validate()?;
        let current = records.require(id, T::NOT_FOUND).await?;
        let patch = to_patch(&payload)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut merged = match serde_json::to_value(&current.data)? {
            JsonValue::Object(map) => map,
            _ => return Err(Error::Internal("Catalog entity must serialize to an object".into())),
        };
        merged.extend(patch.clone());
        let merged: T = serde_json::from_value(JsonValue::Object(merged))
            .map_err(|e| Error::BadRequest(format!("Datos inválidos: {}", e)))?;
        merged.check()?;

        let fields: Vec<String> = patch.keys().cloned().collect();
        let updated = records
            .patch(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(T::NOT_FOUND.into()))?;
        info!(collection = T::COLLECTION, id, actor, "catalog record updated");
        self.log(actor, "updated", id, Some(json!({ "fields": fields })), client).await;
        Ok(updated)
    }

    /// Soft delete; repeating it on an inactive record still succeeds.
    pub async fn deactivate(&self, id: &str, actor: &str, client: &ClientInfo) -> Result<Record<T>> {
        let records = self.records()?;
        let mut patch = serde_json::Map::new();
        patch.insert("active".into(), JsonValue::Bool(false));
        let record = records
            .patch(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(T::NOT_FOUND.into()))?;
        info!(collection = T::COLLECTION, id, actor, "catalog record deactivated");
        self.log(actor, "deactivated", id, None, client).await;
        Ok(record)
    }

    pub async fn count_active(&self) -> Result<i64> {
        match &self.records {
            Some(records) => records.count(&DocumentQuery::new().eq("active", true)).await,
            None => Ok(T::fallback().len() as i64),
        }
    }

    fn records(&self) -> Result<&Collection<T>> {
        self.records
            .as_ref()
            .ok_or_else(|| Error::unavailable("base de datos"))
    }

    async fn log(&self, actor: &str, action: &str, id: &str, details: Option<JsonValue>, client: &ClientInfo) {
        if let Some(store) = &self.store {
            ActivityService::new(store.clone())
                .log(Some(actor), action, T::COLLECTION, id, details, client)
                .await;
        }
    }
}

fn fallback_records<T: CatalogEntity + Clone>(featured: Option<bool>, limit: i64) -> Vec<Record<T>> {
    let epoch = DateTime::<Utc>::default();
    T::fallback()
        .into_iter()
        .enumerate()
        .map(|(idx, data)| Record {
            id: format!("{}-{}", T::COLLECTION, idx + 1),
            data,
            created_at: epoch,
            updated_at: epoch,
        })
        .filter(|record| match featured {
            Some(wanted) => serde_json::to_value(&record.data)
                .ok()
                .and_then(|v| v.get("featured").and_then(JsonValue::as_bool))
                == Some(wanted),
            None => true,
        })
        .take(limit.max(0) as usize)
        .collect()
}

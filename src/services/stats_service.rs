use std::sync::Arc;

use crate::database::store::{DocumentQuery, DocumentStore};
use crate::dto::dashboard_dto::{DashboardStats, StatusCounts};
use crate::error::Result;
use crate::models::catalog::{Branch, Brand, CatalogEntity, JobPosting, News, Promotion};
use crate::services::catalog_service::CatalogService;
use crate::models::status::{ApplicationStatus, ContactStatus, QuotationStatus, Workflow};
use crate::models::{contact_request, job_application, quotation};

pub struct StatsService {
    store: Arc<dyn DocumentStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let mut catalog = std::collections::BTreeMap::new();
        catalog.insert(Branch::COLLECTION.to_string(), self.active::<Branch>().await?);
        catalog.insert(Brand::COLLECTION.to_string(), self.active::<Brand>().await?);
        catalog.insert(News::COLLECTION.to_string(), self.active::<News>().await?);
        catalog.insert(Promotion::COLLECTION.to_string(), self.active::<Promotion>().await?);
        catalog.insert(JobPosting::COLLECTION.to_string(), self.active::<JobPosting>().await?);

        Ok(DashboardStats {
            contact_requests: self.status_counts::<ContactStatus>(contact_request::COLLECTION).await?,
            job_applications: self
                .status_counts::<ApplicationStatus>(job_application::COLLECTION)
                .await?,
            quotations: self.status_counts::<QuotationStatus>(quotation::COLLECTION).await?,
            catalog,
        })
    }

    async fn active<T: CatalogEntity + Clone>(&self) -> Result<i64> {
        CatalogService::<T>::new(Some(self.store.clone()))
            .count_active()
            .await
    }

    async fn status_counts<W: Workflow>(&self, collection: &str) -> Result<StatusCounts> {
        let mut counts = StatusCounts {
            total: self.store.count(collection, &DocumentQuery::new()).await?,
            ..Default::default()
        };
        for status in W::ALL {
            let n = self
                .store
                .count(collection, &DocumentQuery::new().eq("status", status.as_str()))
                .await?;
            counts.by_status.insert(status.as_str().to_string(), n);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn counts_every_status_even_when_zero() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        store
            .insert(contact_request::COLLECTION, json!({"status": "pendiente"}))
            .await
            .unwrap();
        store
            .insert(contact_request::COLLECTION, json!({"status": "resuelta"}))
            .await
            .unwrap();
        store
            .insert(Brand::COLLECTION, json!({"name": "Truper", "active": true}))
            .await
            .unwrap();
        store
            .insert(Brand::COLLECTION, json!({"name": "Pretul", "active": false}))
            .await
            .unwrap();

        let stats = StatsService::new(store).dashboard().await.unwrap();
        assert_eq!(stats.contact_requests.total, 2);
        assert_eq!(stats.contact_requests.by_status["pendiente"], 1);
        assert_eq!(stats.contact_requests.by_status["asignada"], 0);
        assert_eq!(stats.job_applications.total, 0);
        assert_eq!(stats.catalog["brands"], 1);
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::postgres::PgDocumentStore;
use super::store::DocumentStore;

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Connects and migrates the document store, or `None` when no database is configured.
pub async fn connect_store(config: &Config) -> Result<Option<Arc<dyn DocumentStore>>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; catalog routes will serve fallback data");
        return Ok(None);
    };

    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| crate::error::Error::Config(format!("Migration failed: {}", e)))?;
    tracing::info!("Document store connected");

    Ok(Some(Arc::new(PgDocumentStore::new(pool))))
}

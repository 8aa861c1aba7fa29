use std::sync::Arc;

use crudkit_records::{Product, Student};
use crudkit_store::{InMemoryStore, RecordStore};

use crate::config::{AppConfig, StoreConfig};

/// Store handles injected into the handler sets, one per resource.
#[derive(Clone)]
pub struct AppServices {
    pub students: Arc<dyn RecordStore<Student>>,
    pub products: Arc<dyn RecordStore<Product>>,
}

impl AppServices {
    pub fn new(
        students: Arc<dyn RecordStore<Student>>,
        products: Arc<dyn RecordStore<Product>>,
    ) -> Self {
        Self { students, products }
    }

    /// Fresh, empty in-memory collections (dev/test).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::<Student>::new()),
            Arc::new(InMemoryStore::<Product>::new()),
        )
    }
}

/// Construct the configured store backend.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreConfig::Memory => {
            tracing::warn!("using in-memory store; records are lost on restart");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres { database_url } => build_postgres_services(database_url).await,
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres_services(database_url: &str) -> anyhow::Result<AppServices> {
    use anyhow::Context;
    use crudkit_store::{PostgresStore, postgres::ensure_schema};

    let pool = sqlx::PgPool::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    ensure_schema(&pool)
        .await
        .context("failed to prepare documents table")?;

    let pool = Arc::new(pool);
    Ok(AppServices::new(
        Arc::new(PostgresStore::<Student>::new(pool.clone())),
        Arc::new(PostgresStore::<Product>::new(pool)),
    ))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres_services(_database_url: &str) -> anyhow::Result<AppServices> {
    anyhow::bail!("STORE_BACKEND=postgres requires a build with the `postgres` feature")
}

//! Database module - AppState and database operations
//!
//! Split into submodules per concern:
//! - `organization` - organization profile reads
//! - `assessment` - stored risk-assessment answers
//! - `evidence` - compliance evidence queries
//! - `incident` - incident log and breach-notification inserts

mod assessment;
mod evidence;
mod incident;
mod organization;

use moka::future::Cache;
use sqlx::PgPool;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::organization::model::OrganizationData;
use crate::storage::{ObjectStorage, SupabaseConfig, SupabaseStorage};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub organization_cache: Cache<String, OrganizationData>,
    pub http_client: reqwest::Client,
    pub storage: Arc<dyn ObjectStorage + Send + Sync>,
}

impl AppState {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let supabase_config = SupabaseConfig::from_env()?;
        Self::new_with_config(supabase_config).await
    }

    pub async fn new_with_config(
        supabase_config: SupabaseConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let database_url = env::var("DATABASE_URL")?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&database_url)
            .await?;

        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent("hipaa-compliance-server/1.0")
            .build()?;

        let storage = Arc::new(SupabaseStorage::new(supabase_config, http_client.clone()));

        Ok(Self::assemble(pool, http_client, storage))
    }

    /// Used by tests to inject a mock storage backend.
    pub fn new_with_pool_and_storage(
        pool: PgPool,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
    ) -> Self {
        let http_client = reqwest::Client::new();
        Self::assemble(pool, http_client, storage)
    }

    fn assemble(
        pool: PgPool,
        http_client: reqwest::Client,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
    ) -> Self {
        let organization_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(1000)
            .build();

        AppState {
            pool,
            organization_cache,
            http_client,
            storage,
        }
    }
}

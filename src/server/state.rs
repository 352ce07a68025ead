use crate::server::repository::RepositoryRegistry;
use crate::server::settings::{DatabaseSettings, Settings};
use crate::server::store::{ImageStore, MemoryStore, PostgresStore, RepositoryStore};
use crate::server::webhook::{PushEventProcessor, PushEventReporter, TracingReporter};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: RepositoryRegistry,
    pub images: Arc<dyn ImageStore>,
    pub push_processor: Arc<PushEventProcessor>,
}

impl AppState {
    /// Run database migrations
    async fn run_migrations(pool: &PgPool) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations completed successfully");
        Ok(())
    }

    /// Initialize state for the HTTP server from settings
    pub async fn new_for_server(settings: &Settings) -> Result<Self> {
        tracing::info!("Initializing AppState for HTTP server");

        match &settings.database {
            DatabaseSettings::Postgres {
                url,
                max_connections,
            } => {
                tracing::info!(
                    "Connecting to PostgreSQL with {} max connections...",
                    max_connections
                );

                let db_pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(url)
                    .await
                    .context("Failed to connect to PostgreSQL")?;

                tracing::info!("Successfully connected to PostgreSQL");

                Self::run_migrations(&db_pool).await?;

                let store = Arc::new(PostgresStore::new(db_pool));
                Ok(Self::from_stores(
                    store.clone(),
                    store,
                    Arc::new(TracingReporter),
                ))
            }
            DatabaseSettings::Memory => {
                tracing::warn!("Using in-memory storage; records are lost on restart");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::from_stores(
                    store.clone(),
                    store,
                    Arc::new(TracingReporter),
                ))
            }
        }
    }

    /// Wire the registry and push processor over the given stores
    pub fn from_stores(
        repositories: Arc<dyn RepositoryStore>,
        images: Arc<dyn ImageStore>,
        reporter: Arc<dyn PushEventReporter>,
    ) -> Self {
        let registry = RepositoryRegistry::new(repositories);
        let push_processor = Arc::new(PushEventProcessor::new(
            registry.clone(),
            images.clone(),
            reporter,
        ));

        Self {
            registry,
            images,
            push_processor,
        }
    }
}

use crate::db::models::{DockerImage, DockerRepository};
use crate::db::{images, repositories};
use crate::server::store::{ImageStore, RepositoryStore, StoreError, UniqueField};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed store. Uniqueness is enforced by table constraints.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique violation into `StoreError::Conflict`, anything else is unavailability
fn classify(err: anyhow::Error) -> StoreError {
    let field = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint())
        .and_then(UniqueField::from_constraint);

    match field {
        Some(field) => StoreError::Conflict(field),
        None => StoreError::Unavailable(err),
    }
}

#[async_trait]
impl RepositoryStore for PostgresStore {
    async fn list(&self) -> Result<Vec<DockerRepository>, StoreError> {
        repositories::list(&self.pool).await.map_err(classify)
    }

    async fn find_by_name_or_repository(
        &self,
        name: &str,
        repository: &str,
    ) -> Result<Vec<DockerRepository>, StoreError> {
        repositories::find_by_name_or_repository(&self.pool, name, repository)
            .await
            .map_err(classify)
    }

    async fn find_by_repository(
        &self,
        repository: &str,
    ) -> Result<Option<DockerRepository>, StoreError> {
        repositories::find_by_repository(&self.pool, repository)
            .await
            .map_err(classify)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DockerRepository>, StoreError> {
        repositories::find_by_id(&self.pool, id)
            .await
            .map_err(classify)
    }

    async fn create(
        &self,
        name: &str,
        registry: &str,
        repository: &str,
    ) -> Result<DockerRepository, StoreError> {
        repositories::create(&self.pool, name, registry, repository)
            .await
            .map_err(classify)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        repositories::delete(&self.pool, id).await.map_err(classify)
    }
}

#[async_trait]
impl ImageStore for PostgresStore {
    async fn find_by_image(&self, image: &str) -> Result<Option<DockerImage>, StoreError> {
        images::find_by_image(&self.pool, image)
            .await
            .map_err(classify)
    }

    async fn insert(&self, image: &str, repository_id: Uuid) -> Result<DockerImage, StoreError> {
        images::insert(&self.pool, image, repository_id)
            .await
            .map_err(classify)
    }

    async fn list_for_repository(
        &self,
        repository_id: Uuid,
    ) -> Result<Vec<DockerImage>, StoreError> {
        images::list_for_repository(&self.pool, repository_id)
            .await
            .map_err(classify)
    }
}

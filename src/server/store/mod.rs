pub mod providers;

use crate::db::models::{DockerImage, DockerRepository};
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

pub use providers::{MemoryStore, PostgresStore};

/// Column protected by a storage-level unique constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Name,
    Repository,
    Image,
}

impl UniqueField {
    /// Map a PostgreSQL constraint name to the field it protects
    pub fn from_constraint(constraint: &str) -> Option<Self> {
        match constraint {
            "docker_repositories_name_key" => Some(UniqueField::Name),
            "docker_repositories_repository_key" => Some(UniqueField::Repository),
            "docker_images_image_key" => Some(UniqueField::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Name => write!(f, "name"),
            UniqueField::Repository => write!(f, "repository"),
            UniqueField::Image => write!(f, "image"),
        }
    }
}

/// Errors returned by store implementations.
///
/// A unique violation is reported as `Conflict` so callers can tell it apart
/// from the store being unreachable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    Conflict(UniqueField),

    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Storage contract for registered repositories
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// All repositories, newest first
    async fn list(&self) -> Result<Vec<DockerRepository>, StoreError>;

    /// Repositories whose name equals `name` or whose path equals `repository`
    async fn find_by_name_or_repository(
        &self,
        name: &str,
        repository: &str,
    ) -> Result<Vec<DockerRepository>, StoreError>;

    /// Exact, case-sensitive lookup by repository path
    async fn find_by_repository(
        &self,
        repository: &str,
    ) -> Result<Option<DockerRepository>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DockerRepository>, StoreError>;

    /// Persist a new repository.
    ///
    /// Fails with `StoreError::Conflict` if `name` or `repository` is taken.
    async fn create(
        &self,
        name: &str,
        registry: &str,
        repository: &str,
    ) -> Result<DockerRepository, StoreError>;

    /// Delete a repository and its images. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Storage contract for the image log
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn find_by_image(&self, image: &str) -> Result<Option<DockerImage>, StoreError>;

    /// Record a new image.
    ///
    /// Fails with `StoreError::Conflict(UniqueField::Image)` if the reference
    /// is already recorded.
    async fn insert(&self, image: &str, repository_id: Uuid) -> Result<DockerImage, StoreError>;

    /// Images of one repository, newest first
    async fn list_for_repository(&self, repository_id: Uuid)
        -> Result<Vec<DockerImage>, StoreError>;
}

use super::validation::{validate_new_repository, FieldError};
use crate::db::models::DockerRepository;
use crate::server::store::{RepositoryStore, StoreError, UniqueField};
use std::sync::Arc;
use uuid::Uuid;

/// Errors from registering a repository
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("invalid repository fields")]
    Invalid(Vec<FieldError>),

    #[error("repository conflicts on {0:?}")]
    Conflict(Vec<UniqueField>),

    #[error(transparent)]
    Storage(StoreError),
}

/// The set of repositories whose pushes are tracked.
///
/// Name and path uniqueness is pre-checked to report every collision at once;
/// the store's constraints remain the source of truth under concurrent
/// registration.
#[derive(Clone)]
pub struct RepositoryRegistry {
    store: Arc<dyn RepositoryStore>,
}

impl RepositoryRegistry {
    pub fn new(store: Arc<dyn RepositoryStore>) -> Self {
        Self { store }
    }

    /// Register a new repository.
    ///
    /// Input is trimmed and validated first. Conflicts on `name` and
    /// `repository` are computed from one lookup and reported together.
    pub async fn register(
        &self,
        name: &str,
        registry: &str,
        repository: &str,
    ) -> Result<DockerRepository, RegisterError> {
        let (name, registry, repository) = (name.trim(), registry.trim(), repository.trim());

        validate_new_repository(name, registry, repository).map_err(RegisterError::Invalid)?;

        let existing = self
            .store
            .find_by_name_or_repository(name, repository)
            .await
            .map_err(RegisterError::Storage)?;

        let mut conflicts = Vec::new();
        if existing.iter().any(|r| r.name == name) {
            conflicts.push(UniqueField::Name);
        }
        if existing.iter().any(|r| r.repository == repository) {
            conflicts.push(UniqueField::Repository);
        }
        if !conflicts.is_empty() {
            return Err(RegisterError::Conflict(conflicts));
        }

        match self.store.create(name, registry, repository).await {
            Ok(created) => {
                tracing::info!(
                    repository_id = %created.id,
                    name = %created.name,
                    repository = %created.repository,
                    "Registered docker repository"
                );
                Ok(created)
            }
            // Lost a race with a concurrent registration
            Err(StoreError::Conflict(field)) => Err(RegisterError::Conflict(vec![field])),
            Err(e) => Err(RegisterError::Storage(e)),
        }
    }

    /// Exact, case-sensitive lookup by the path the registry reports
    pub async fn find_by_repository_path(
        &self,
        path: &str,
    ) -> Result<Option<DockerRepository>, StoreError> {
        self.store.find_by_repository(path).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DockerRepository>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Delete a repository. Unknown ids are not an error.
    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        if self.store.delete(id).await? {
            tracing::info!(repository_id = %id, "Deleted docker repository");
        } else {
            tracing::debug!(repository_id = %id, "Docker repository to delete not found");
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<DockerRepository>, StoreError> {
        self.store.list().await
    }
}

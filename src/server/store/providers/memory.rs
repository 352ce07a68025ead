use crate::db::models::{DockerImage, DockerRepository};
use crate::server::store::{ImageStore, RepositoryStore, StoreError, UniqueField};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    repositories: Vec<DockerRepository>,
    images: Vec<DockerImage>,
}

/// In-process store with the same constraints as the PostgreSQL schema.
///
/// Every check-and-write happens under one write lock, so uniqueness holds
/// under concurrent callers. Deleting a repository removes its images.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl RepositoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<DockerRepository>, StoreError> {
        let state = self.state.read().await;
        Ok(newest_first(state.repositories.clone(), |r| r.created_at))
    }

    async fn find_by_name_or_repository(
        &self,
        name: &str,
        repository: &str,
    ) -> Result<Vec<DockerRepository>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .repositories
            .iter()
            .filter(|r| r.name == name || r.repository == repository)
            .cloned()
            .collect())
    }

    async fn find_by_repository(
        &self,
        repository: &str,
    ) -> Result<Option<DockerRepository>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .repositories
            .iter()
            .find(|r| r.repository == repository)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DockerRepository>, StoreError> {
        let state = self.state.read().await;
        Ok(state.repositories.iter().find(|r| r.id == id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        registry: &str,
        repository: &str,
    ) -> Result<DockerRepository, StoreError> {
        let mut state = self.state.write().await;

        if state.repositories.iter().any(|r| r.name == name) {
            return Err(StoreError::Conflict(UniqueField::Name));
        }
        if state.repositories.iter().any(|r| r.repository == repository) {
            return Err(StoreError::Conflict(UniqueField::Repository));
        }

        let created = DockerRepository {
            id: Uuid::new_v4(),
            name: name.to_string(),
            registry: registry.to_string(),
            repository: repository.to_string(),
            created_at: Utc::now(),
        };
        state.repositories.push(created.clone());

        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let before = state.repositories.len();
        state.repositories.retain(|r| r.id != id);
        let removed = state.repositories.len() != before;

        if removed {
            state.images.retain(|i| i.repository_id != id);
        }

        Ok(removed)
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn find_by_image(&self, image: &str) -> Result<Option<DockerImage>, StoreError> {
        let state = self.state.read().await;
        Ok(state.images.iter().find(|i| i.image == image).cloned())
    }

    async fn insert(&self, image: &str, repository_id: Uuid) -> Result<DockerImage, StoreError> {
        let mut state = self.state.write().await;

        if !state.repositories.iter().any(|r| r.id == repository_id) {
            return Err(StoreError::Unavailable(anyhow::anyhow!(
                "Repository {} does not exist",
                repository_id
            )));
        }
        if state.images.iter().any(|i| i.image == image) {
            return Err(StoreError::Conflict(UniqueField::Image));
        }

        let inserted = DockerImage {
            id: Uuid::new_v4(),
            image: image.to_string(),
            repository_id,
            created_at: Utc::now(),
        };
        state.images.push(inserted.clone());

        Ok(inserted)
    }

    async fn list_for_repository(
        &self,
        repository_id: Uuid,
    ) -> Result<Vec<DockerImage>, StoreError> {
        let state = self.state.read().await;
        let images = state
            .images
            .iter()
            .filter(|i| i.repository_id == repository_id)
            .cloned()
            .collect();
        Ok(newest_first(images, |i| i.created_at))
    }
}

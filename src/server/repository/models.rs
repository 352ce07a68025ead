use crate::db::models::{DockerImage as DbImage, DockerRepository as DbRepository};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DockerRepository {
    pub id: String,
    pub name: String,
    pub registry: String,
    pub repository: String,
    pub created: String,
}

impl From<DbRepository> for DockerRepository {
    fn from(repository: DbRepository) -> Self {
        Self {
            id: repository.id.to_string(),
            name: repository.name,
            registry: repository.registry,
            repository: repository.repository,
            created: repository.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DockerImage {
    pub id: String,
    /// Canonical reference (`registry/repository:tag`)
    pub image: String,
    pub repository_id: String,
    pub created: String,
}

impl From<DbImage> for DockerImage {
    fn from(image: DbImage) -> Self {
        Self {
            id: image.id.to_string(),
            image: image.image,
            repository_id: image.repository_id.to_string(),
            created: image.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateRepositoryRequest {
    pub name: String,
    /// Registry hostname, e.g. "registry.example.com"
    pub registry: String,
    /// Repository path as the registry reports it, e.g. "org/app"
    pub repository: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateRepositoryResponse {
    pub repository: DockerRepository,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListRepositoriesResponse {
    pub repositories: Vec<DockerRepository>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListImagesResponse {
    pub images: Vec<DockerImage>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Docker repository model - a registry repository whose pushes are tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DockerRepository {
    pub id: Uuid,
    /// Operator-facing label, unique across repositories
    pub name: String,
    /// Hostname of the registry serving this repository (e.g. "registry.example.com")
    pub registry: String,
    /// Fully-qualified repository path as reported by the registry (e.g. "org/app")
    pub repository: String,
    pub created_at: DateTime<Utc>,
}

/// Docker image model - one recorded push of a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DockerImage {
    pub id: Uuid,
    /// Canonical reference in the form `registry/repository:tag`
    pub image: String,
    pub repository_id: Uuid,
    pub created_at: DateTime<Utc>,
}

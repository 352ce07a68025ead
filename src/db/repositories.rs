use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::DockerRepository;

/// List all repositories
pub async fn list(pool: &PgPool) -> Result<Vec<DockerRepository>> {
    let repositories = sqlx::query_as::<_, DockerRepository>(
        r#"
        SELECT id, name, registry, repository, created_at
        FROM docker_repositories
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list docker repositories")?;

    Ok(repositories)
}

/// Find repositories whose name or repository path matches.
///
/// Both columns are checked in one statement so the caller sees a single
/// snapshot when reporting conflicts.
pub async fn find_by_name_or_repository(
    pool: &PgPool,
    name: &str,
    repository: &str,
) -> Result<Vec<DockerRepository>> {
    let repositories = sqlx::query_as::<_, DockerRepository>(
        r#"
        SELECT id, name, registry, repository, created_at
        FROM docker_repositories
        WHERE name = $1 OR repository = $2
        "#,
    )
    .bind(name)
    .bind(repository)
    .fetch_all(pool)
    .await
    .context("Failed to find docker repositories by name or repository")?;

    Ok(repositories)
}

/// Find repository by its fully-qualified path (case-sensitive)
pub async fn find_by_repository(
    pool: &PgPool,
    repository: &str,
) -> Result<Option<DockerRepository>> {
    let found = sqlx::query_as::<_, DockerRepository>(
        r#"
        SELECT id, name, registry, repository, created_at
        FROM docker_repositories
        WHERE repository = $1
        "#,
    )
    .bind(repository)
    .fetch_optional(pool)
    .await
    .context("Failed to find docker repository by path")?;

    Ok(found)
}

/// Find repository by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DockerRepository>> {
    let found = sqlx::query_as::<_, DockerRepository>(
        r#"
        SELECT id, name, registry, repository, created_at
        FROM docker_repositories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to find docker repository by ID")?;

    Ok(found)
}

/// Create a new repository
pub async fn create(
    pool: &PgPool,
    name: &str,
    registry: &str,
    repository: &str,
) -> Result<DockerRepository> {
    let created = sqlx::query_as::<_, DockerRepository>(
        r#"
        INSERT INTO docker_repositories (name, registry, repository)
        VALUES ($1, $2, $3)
        RETURNING id, name, registry, repository, created_at
        "#,
    )
    .bind(name)
    .bind(registry)
    .bind(repository)
    .fetch_one(pool)
    .await
    .context("Failed to create docker repository")?;

    Ok(created)
}

/// Delete repository by ID. Images are removed by the foreign key cascade.
///
/// Returns whether a row was deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM docker_repositories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete docker repository")?;

    Ok(result.rows_affected() > 0)
}

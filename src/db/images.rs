use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::DockerImage;

/// Find image by its canonical reference
pub async fn find_by_image(pool: &PgPool, image: &str) -> Result<Option<DockerImage>> {
    let found = sqlx::query_as::<_, DockerImage>(
        r#"
        SELECT id, image, repository_id, created_at
        FROM docker_images
        WHERE image = $1
        "#,
    )
    .bind(image)
    .fetch_optional(pool)
    .await
    .context("Failed to find docker image")?;

    Ok(found)
}

/// Insert a new image record.
///
/// Fails with a unique violation on `docker_images_image_key` if the
/// reference is already recorded.
pub async fn insert(pool: &PgPool, image: &str, repository_id: Uuid) -> Result<DockerImage> {
    let inserted = sqlx::query_as::<_, DockerImage>(
        r#"
        INSERT INTO docker_images (image, repository_id)
        VALUES ($1, $2)
        RETURNING id, image, repository_id, created_at
        "#,
    )
    .bind(image)
    .bind(repository_id)
    .fetch_one(pool)
    .await
    .context("Failed to insert docker image")?;

    Ok(inserted)
}

/// List images recorded for a repository, newest first
pub async fn list_for_repository(pool: &PgPool, repository_id: Uuid) -> Result<Vec<DockerImage>> {
    let images = sqlx::query_as::<_, DockerImage>(
        r#"
        SELECT id, image, repository_id, created_at
        FROM docker_images
        WHERE repository_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(repository_id)
    .fetch_all(pool)
    .await
    .context("Failed to list docker images")?;

    Ok(images)
}

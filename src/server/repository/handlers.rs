use super::models::{
    CreateRepositoryRequest, CreateRepositoryResponse, DockerImage, DockerRepository,
    ListImagesResponse, ListRepositoriesResponse,
};
use super::registry::RegisterError;
use super::validation::FieldError;
use crate::server::error::{ServerError, ServerErrorExt};
use crate::server::state::AppState;
use crate::server::store::UniqueField;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

fn conflict_message(field: UniqueField) -> FieldError {
    match field {
        UniqueField::Name => FieldError::new("name", "Name already exists"),
        UniqueField::Repository => FieldError::new("repository", "Repository already exists"),
        UniqueField::Image => FieldError::new("image", "Image already exists"),
    }
}

fn parse_repository_id(id: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(id).server_err(StatusCode::BAD_REQUEST, "Invalid repository ID")
}

pub async fn create_repository(
    State(state): State<AppState>,
    Json(payload): Json<CreateRepositoryRequest>,
) -> Result<Json<CreateRepositoryResponse>, ServerError> {
    tracing::info!(
        "Creating docker repository '{}' for {}",
        payload.name,
        payload.repository
    );

    let repository = state
        .registry
        .register(&payload.name, &payload.registry, &payload.repository)
        .await
        .map_err(|e| match e {
            RegisterError::Invalid(errors) => {
                ServerError::bad_request("Invalid repository").with_field_errors(errors)
            }
            RegisterError::Conflict(fields) => {
                ServerError::conflict("Repository already registered")
                    .with_field_errors(fields.into_iter().map(conflict_message))
            }
            RegisterError::Storage(e) => {
                ServerError::internal_anyhow(e.into(), "Failed to create repository")
                    .with_context("repository", payload.repository.clone())
            }
        })?;

    Ok(Json(CreateRepositoryResponse {
        repository: repository.into(),
    }))
}

pub async fn list_repositories(
    State(state): State<AppState>,
) -> Result<Json<ListRepositoriesResponse>, ServerError> {
    let repositories = state
        .registry
        .list()
        .await
        .internal_err("Failed to list repositories")?;

    Ok(Json(ListRepositoriesResponse {
        repositories: repositories.into_iter().map(DockerRepository::from).collect(),
    }))
}

/// Delete a repository. Deleting an unknown repository succeeds.
pub async fn delete_repository(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_repository_id(&id)?;

    state
        .registry
        .remove(id)
        .await
        .internal_err("Failed to delete repository")
        .map_err(|e| e.with_context("repository_id", id.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListImagesResponse>, ServerError> {
    let id = parse_repository_id(&id)?;

    let repository = state
        .registry
        .find_by_id(id)
        .await
        .internal_err("Failed to find repository")
        .map_err(|e| e.with_context("repository_id", id.to_string()))?
        .ok_or_else(|| ServerError::not_found("Repository not found"))?;

    let images = state
        .images
        .list_for_repository(repository.id)
        .await
        .internal_err("Failed to list images")
        .map_err(|e| e.with_context("repository_id", id.to_string()))?;

    Ok(Json(ListImagesResponse {
        images: images.into_iter().map(DockerImage::from).collect(),
    }))
}

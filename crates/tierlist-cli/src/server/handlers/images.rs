//! Image listing, upload and bulk delete handlers.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tierlist::store::IMAGE_URL_PREFIX;
use tierlist::{ImageId, Upload};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Multipart field carrying the files.
pub const UPLOAD_FIELD: &str = "images";

/// Response after a successful upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Stored file names, in upload order.
    pub files: Vec<String>,
}

/// Response after deleting every image.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /api/list-images
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageId>>, ApiError> {
    let images = state.store().list()?;
    Ok(Json(images))
}

/// POST /api/upload
///
/// Every file is checked before any is written; one bad file rejects the
/// whole request. The size cap is enforced per file while it streams in.
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let policy = &state.config.policy;
    let mut uploads = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        policy.check_type(&file_name, &content_type)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            ApiError::BadRequest(format!("Failed to read '{}': {}", file_name, e))
        })? {
            policy.check_size(&file_name, bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        uploads.push(Upload::new(file_name, content_type, bytes));
    }

    if uploads.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded.".to_string()));
    }

    let stored = state.store().store_all(&uploads)?;
    let files: Vec<String> = stored
        .iter()
        .map(|id| id.strip_prefix(IMAGE_URL_PREFIX).unwrap_or(id).to_string())
        .collect();

    tracing::info!(count = files.len(), "images uploaded");

    Ok(Json(UploadResponse {
        message: "Images uploaded successfully".to_string(),
        files,
    }))
}

/// DELETE /api/delete-all-images
pub async fn delete_all_images(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.store().delete_all()?;
    tracing::info!(path = %state.store.root().display(), "all images deleted");

    Ok(Json(DeleteResponse {
        message: "All images deleted successfully".to_string(),
    }))
}

/// Fallback for unknown `/api` routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such API route".to_string())
}

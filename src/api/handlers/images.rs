use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::load_draft;
use crate::api::response::{ApiError, AppJson, JSend};
use crate::images::{FileHandle, ImageSetManager, MetadataUpdate};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

/// A ledger entry as shown to form clients.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub byte_size: Option<u64>,
    pub caption: String,
    pub content_type: Option<String>,
    /// False when the file content was lost (e.g. after a restart).
    pub has_file: bool,
    pub id: String,
    pub is_primary: bool,
    pub order: u32,
    pub original_filename: String,
    /// Index to use in `/images/:index` routes.
    pub position: usize,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageView>,
    pub primary_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateImageRequest {
    pub field: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

// ============================================================================
// Handlers
// ============================================================================

/// Accepts repeated `images` parts (`images[]` is accepted too).
pub async fn add_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let max_upload_size = state.config.images.max_upload_size;
    let max_images = state.config.images.max_images_per_draft;

    // Fail fast on unknown drafts before buffering the upload
    load_draft(&state, &id)?;

    let mut files: Vec<FileHandle> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "images" && field_name != "images[]" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("image-{}", files.len() + 1));
        let declared_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read image: {e}")))?;

        if data.len() as u64 > max_upload_size {
            return Err(ApiError::payload_too_large(format!(
                "'{filename}' exceeds maximum upload size of {max_upload_size} bytes"
            )));
        }

        let content_type = resolve_content_type(declared_type, &filename);
        if !content_type.starts_with("image/") {
            return Err(ApiError::unsupported_media_type(format!(
                "'{filename}' is not an image ({content_type})"
            )));
        }

        files.push(FileHandle::new(filename, content_type, data));
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("at least one images part is required"));
    }

    let count = files.len();
    let response = mutate_images(&state, &id, |images| {
        if images.len() + count > max_images {
            return Err(ApiError::bad_request(format!(
                "a draft can hold at most {max_images} images"
            )));
        }
        images.add_files(files);
        Ok(())
    })
    .await?;

    tracing::debug!(draft_id = %id, added = count, "Added images");
    Ok(JSend::success(response))
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let draft = load_draft(&state, &id)?;
    let response = state
        .workspace
        .with_images(&draft, |images| images_response(images))
        .await;
    Ok(JSend::success(response))
}

pub async fn remove_image(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let response = mutate_images(&state, &id, |images| {
        let removed = images.remove_at(index)?;
        tracing::debug!(draft_id = %id, image_id = %removed.id, "Removed image");
        Ok(())
    })
    .await?;
    Ok(JSend::success(response))
}

pub async fn update_image(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
    AppJson(req): AppJson<UpdateImageRequest>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let update = MetadataUpdate::from_field(&req.field, req.value)?;

    let response = mutate_images(&state, &id, |images| {
        images.update_metadata(index, update)?;
        Ok(())
    })
    .await?;
    Ok(JSend::success(response))
}

pub async fn set_primary_image(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let response = mutate_images(&state, &id, |images| Ok(images.set_primary(index)?)).await?;
    Ok(JSend::success(response))
}

pub async fn clear_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let response = mutate_images(&state, &id, |images| {
        images.clear();
        Ok(())
    })
    .await?;

    tracing::debug!(draft_id = %id, "Cleared images");
    Ok(JSend::success(response))
}

pub async fn normalize_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<ImagesResponse>>, ApiError> {
    let response = mutate_images(&state, &id, |images| {
        images.normalize_order();
        Ok(())
    })
    .await?;
    Ok(JSend::success(response))
}

// ============================================================================
// Helpers
// ============================================================================

/// Apply `f` to the draft's image set and persist the resulting ledger.
/// Nothing is persisted when `f` fails.
async fn mutate_images<F>(state: &AppState, id: &str, f: F) -> Result<ImagesResponse, ApiError>
where
    F: FnOnce(&mut ImageSetManager) -> Result<(), ApiError>,
{
    let draft = load_draft(state, id)?;

    let (response, ledger) = state
        .workspace
        .with_images(&draft, |images| {
            f(images)?;
            Ok::<_, ApiError>((images_response(images), images.ledger().to_vec()))
        })
        .await?;

    if state
        .db
        .modify_draft(id, |draft| draft.images = ledger)?
        .is_none()
    {
        // Deleted while we were working on it
        state.workspace.discard(id).await;
        return Err(ApiError::not_found("Draft not found"));
    }

    Ok(response)
}

pub(super) fn image_views(images: &ImageSetManager) -> Vec<ImageView> {
    images
        .ledger()
        .iter()
        .enumerate()
        .map(|(position, descriptor)| {
            let file = images.get_file(&descriptor.id).ok();
            ImageView {
                byte_size: file.map(|f| f.byte_size()),
                caption: descriptor.caption.clone(),
                content_type: file.map(|f| f.content_type.clone()),
                has_file: file.is_some(),
                id: descriptor.id.clone(),
                is_primary: descriptor.is_primary,
                order: descriptor.order,
                original_filename: descriptor.original_filename.clone(),
                position,
            }
        })
        .collect()
}

fn images_response(images: &ImageSetManager) -> ImagesResponse {
    ImagesResponse {
        images: image_views(images),
        primary_index: images.primary_index(),
    }
}

/// Content type from the multipart header, or guessed from the filename, or a
/// binary fallback.
fn resolve_content_type(declared: Option<String>, filename: &str) -> String {
    declared
        .filter(|ct| ct != "application/octet-stream")
        .or_else(|| mime_guess::from_path(filename).first().map(|m| m.to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

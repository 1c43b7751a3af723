use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use super::load_draft;
use crate::api::response::ApiError;
use crate::AppState;

/// Serve a staged image's bytes for previewing.
/// Route: GET /drafts/:id/files/:image_id
pub async fn get_image_file(
    State(state): State<Arc<AppState>>,
    Path((id, image_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let draft = load_draft(&state, &id)?;

    let file = state
        .workspace
        .with_images(&draft, |images| images.get_file(&image_id).cloned())
        .await?;

    let byte_size = file.byte_size();
    let mut response = (StatusCode::OK, file.data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        file.content_type
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));

    let filename = file.filename.replace('"', "");
    if let Ok(value) = format!("inline; filename=\"{filename}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    // Staged files can be removed at any moment
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );

    Ok(response)
}

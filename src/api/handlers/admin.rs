use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub drafts_deleted: u64,
    pub image_sets_discarded: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<PurgeResponse>>, ApiError> {
    let stats = state.db.purge_all()?;
    let discarded = state.workspace.discard_all().await;

    tracing::warn!(
        drafts = stats.drafts,
        image_sets = discarded,
        "Purged all data"
    );

    Ok(JSend::success(PurgeResponse {
        drafts_deleted: stats.drafts,
        image_sets_discarded: discarded,
    }))
}

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppQuery, JSend};
use crate::markers::{self, Marker};
use crate::units::PropertyKind;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkerParams {
    #[serde(default)]
    pub property_kind: Option<PropertyKind>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkersResponse {
    pub markers: Vec<Marker>,
    /// Drafts left off the map for lack of coordinates and state.
    pub unplaced: usize,
}

pub async fn list_markers(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<MarkerParams>,
) -> Result<Json<JSend<MarkersResponse>>, ApiError> {
    let drafts = state
        .db
        .list_drafts(params.property_kind, params.state.as_deref())?;

    let markers: Vec<Marker> = drafts.iter().filter_map(markers::place).collect();
    let unplaced = drafts.len() - markers.len();

    Ok(JSend::success(MarkersResponse { markers, unplaced }))
}

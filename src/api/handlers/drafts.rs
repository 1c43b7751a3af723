use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use super::images::{image_views, ImageView};
use super::load_draft;
use crate::api::response::{ApiError, AppJson, AppQuery, JSend, JSendPaginated, Pagination};
use crate::listing;
use crate::markers;
use crate::storage::models::{DraftPatch, DraftRecord, Patch};
use crate::units::{PropertyKind, Unit, UnitsList};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub address: Option<String>,
    pub created_at: String,
    pub description: Option<String>,
    pub id: String,
    pub images: Vec<ImageView>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_kind: PropertyKind,
    pub remote_id: Option<String>,
    pub state: Option<String>,
    pub submitted_at: Option<String>,
    pub title: String,
    pub units: Vec<Unit>,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct DraftSummary {
    pub created_at: String,
    pub id: String,
    pub image_count: usize,
    pub property_kind: PropertyKind,
    pub remote_id: Option<String>,
    pub state: Option<String>,
    pub submitted_at: Option<String>,
    pub title: String,
    pub unit_count: usize,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub property_kind: PropertyKind,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDraftRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct ListDraftsParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub property_kind: Option<PropertyKind>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub draft: DraftSummary,
    pub message: String,
    pub remote_id: Option<String>,
}

fn default_limit() -> u32 {
    20
}

/// Distinguishes between a missing field (`None`) and an explicit `null` (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateDraftRequest>,
) -> Result<Json<JSend<DraftResponse>>, ApiError> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }

    validate_units(req.property_kind, &req.units)?;
    let units = UnitsList::from_vec(req.units)
        .map_err(|_| ApiError::bad_request("at least one unit is required"))?;

    let state_code = normalize_state(req.state)?;
    validate_coordinates(req.latitude, req.longitude)?;

    let now = Utc::now();
    let draft = DraftRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description: req.description,
        property_kind: req.property_kind,
        address: req.address,
        state: state_code,
        latitude: req.latitude,
        longitude: req.longitude,
        remote_id: None,
        images: Vec::new(),
        units,
        created_at: now,
        updated_at: now,
        submitted_at: None,
    };

    state.db.put_draft(&draft)?;

    tracing::debug!(draft_id = %draft.id, property_kind = %draft.property_kind, "Created draft");

    Ok(JSend::success(draft_to_response(&state, &draft).await))
}

pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<DraftResponse>>, ApiError> {
    let draft = load_draft(&state, &id)?;
    Ok(JSend::success(draft_to_response(&state, &draft).await))
}

pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateDraftRequest>,
) -> Result<Json<JSend<DraftResponse>>, ApiError> {
    let title = match req.title {
        Some(title) if title.trim().is_empty() => {
            return Err(ApiError::bad_request("title must not be empty"));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };

    let state_patch = match Patch::from(req.state) {
        Patch::Value(code) => match normalize_state(Some(code))? {
            Some(code) => Patch::Value(code),
            None => Patch::Null,
        },
        other => other,
    };

    let patch = DraftPatch {
        title,
        description: Patch::from(req.description),
        address: Patch::from(req.address),
        state: state_patch,
        latitude: Patch::from(req.latitude),
        longitude: Patch::from(req.longitude),
    };

    if patch.is_empty() {
        return Err(ApiError::bad_request(
            "at least one field (title, description, address, state, latitude, longitude) must be provided",
        ));
    }

    let mut preview = load_draft(&state, &id)?;
    patch.clone().apply(&mut preview);
    validate_coordinates(preview.latitude, preview.longitude)?;

    let draft = state
        .db
        .modify_draft(&id, |draft| patch.apply(draft))?
        .ok_or_else(|| ApiError::not_found("Draft not found"))?;

    tracing::debug!(draft_id = %id, "Updated draft");
    Ok(JSend::success(draft_to_response(&state, &draft).await))
}

pub async fn delete_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    if !state.db.delete_draft(&id)? {
        return Err(ApiError::not_found("Draft not found"));
    }

    state.workspace.discard(&id).await;

    tracing::debug!(draft_id = %id, "Deleted draft");
    Ok(JSend::success(()))
}

pub async fn list_drafts(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListDraftsParams>,
) -> Result<Json<JSendPaginated<DraftSummary>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let drafts = state
        .db
        .list_drafts(params.property_kind, params.state.as_deref())?;

    let total = drafts.len() as u64;
    let items: Vec<DraftSummary> = drafts
        .iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .map(draft_to_summary)
        .collect();

    Ok(JSendPaginated::success(
        items,
        Pagination {
            limit: params.limit,
            offset: params.offset,
            total,
        },
    ))
}

/// Send the draft to the listing backend. On success the images that were sent
/// are released; anything staged while the request was in flight stays. On
/// failure the draft is left exactly as it was.
pub async fn submit_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<SubmitResponse>>, ApiError> {
    let draft = load_draft(&state, &id)?;

    let (fields, staged, missing) = state
        .workspace
        .with_images(&draft, |images| {
            let staged: Vec<String> = images.ledger().iter().map(|d| d.id.clone()).collect();
            let missing = images.len() - images.all_files().count();
            (listing::submission_fields(&draft, images), staged, missing)
        })
        .await;

    if missing > 0 {
        tracing::warn!(
            draft_id = %id,
            missing,
            "Submitting without images whose file content is no longer held"
        );
    }

    let target = listing::submission_target(&draft);
    tracing::info!(draft_id = %id, path = %target.path(), "Submitting draft");

    let response = state.backend.submit(&target, fields).await?;

    if !response.success {
        tracing::warn!(draft_id = %id, message = %response.message, "Backend rejected draft");
        let message = if response.message.is_empty() {
            "Listing backend rejected the submission".to_string()
        } else {
            response.message
        };
        return Err(ApiError::rejected(message));
    }

    let remaining = state
        .workspace
        .with_existing(&id, |images| {
            images.discard_ids(&staged);
            images.ledger().to_vec()
        })
        .await;

    let listing_id = response.listing_id();
    let submitted_at = Utc::now();
    let stored = state.db.modify_draft(&id, |draft| {
        match remaining {
            Some(ledger) => draft.images = ledger,
            None => draft.images.retain(|d| !staged.contains(&d.id)),
        }
        if listing_id.is_some() {
            draft.remote_id = listing_id.clone();
        }
        draft.submitted_at = Some(submitted_at);
    })?;

    let summary = match stored {
        Some(draft) => {
            tracing::info!(draft_id = %id, remote_id = ?draft.remote_id, "Draft submitted");
            draft_to_summary(&draft)
        }
        None => {
            // The listing exists remotely even though the draft is gone here
            tracing::warn!(
                draft_id = %id,
                remote_id = ?listing_id,
                "Draft deleted while its submission was in flight"
            );
            let mut gone = draft;
            gone.images.clear();
            if listing_id.is_some() {
                gone.remote_id = listing_id;
            }
            gone.submitted_at = Some(submitted_at);
            draft_to_summary(&gone)
        }
    };

    Ok(JSend::success(SubmitResponse {
        message: response.message,
        remote_id: summary.remote_id.clone(),
        draft: summary,
    }))
}

// ============================================================================
// Validation
// ============================================================================

/// Form-level unit checks: kind allowed for the property, positive size,
/// non-negative decimal price.
pub(super) fn validate_units(kind: PropertyKind, units: &[Unit]) -> Result<(), ApiError> {
    for (i, unit) in units.iter().enumerate() {
        if !kind.allows(unit.unit) {
            return Err(ApiError::bad_request(format!(
                "units[{i}]: '{}' is not a valid unit for a {kind}",
                unit.unit.as_str()
            )));
        }
        if !(unit.size.is_finite() && unit.size > 0.0) {
            return Err(ApiError::bad_request(format!(
                "units[{i}]: size must be a positive number"
            )));
        }
        let price_ok = unit
            .price
            .trim()
            .parse::<f64>()
            .map(|p| p.is_finite() && p >= 0.0)
            .unwrap_or(false);
        if !price_ok {
            return Err(ApiError::bad_request(format!(
                "units[{i}]: price must be a non-negative decimal"
            )));
        }
    }
    Ok(())
}

fn normalize_state(state: Option<String>) -> Result<Option<String>, ApiError> {
    match state.map(|s| s.trim().to_uppercase()) {
        None => Ok(None),
        Some(code) if code.is_empty() => Ok(None),
        Some(code) if markers::is_known_state(&code) => Ok(Some(code)),
        Some(code) => Err(ApiError::bad_request(format!("unknown state '{code}'"))),
    }
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), ApiError> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::bad_request("latitude must be between -90 and 90"));
        }
    }
    if let Some(lng) = longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::bad_request(
                "longitude must be between -180 and 180",
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

async fn draft_to_response(state: &AppState, draft: &DraftRecord) -> DraftResponse {
    let images = state
        .workspace
        .with_images(draft, |images| image_views(images))
        .await;

    DraftResponse {
        address: draft.address.clone(),
        created_at: draft.created_at.to_rfc3339(),
        description: draft.description.clone(),
        id: draft.id.clone(),
        images,
        latitude: draft.latitude,
        longitude: draft.longitude,
        property_kind: draft.property_kind,
        remote_id: draft.remote_id.clone(),
        state: draft.state.clone(),
        submitted_at: draft.submitted_at.map(|t| t.to_rfc3339()),
        title: draft.title.clone(),
        units: draft.units.as_slice().to_vec(),
        updated_at: draft.updated_at.to_rfc3339(),
    }
}

fn draft_to_summary(draft: &DraftRecord) -> DraftSummary {
    DraftSummary {
        created_at: draft.created_at.to_rfc3339(),
        id: draft.id.clone(),
        image_count: draft.images.len(),
        property_kind: draft.property_kind,
        remote_id: draft.remote_id.clone(),
        state: draft.state.clone(),
        submitted_at: draft.submitted_at.map(|t| t.to_rfc3339()),
        title: draft.title.clone(),
        unit_count: draft.units.len(),
        updated_at: draft.updated_at.to_rfc3339(),
    }
}

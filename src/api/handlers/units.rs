use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::drafts::validate_units;
use super::load_draft;
use crate::api::response::{ApiError, AppJson, JSend};
use crate::units::{PropertyKind, Unit, UnitsList};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UnitsResponse {
    pub units: Vec<Unit>,
}

pub async fn add_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(unit): AppJson<Unit>,
) -> Result<Json<JSend<UnitsResponse>>, ApiError> {
    let response = edit_units(&state, &id, move |kind, units| {
        validate_units(kind, std::slice::from_ref(&unit))?;
        units.add(unit);
        Ok(())
    })
    .await?;
    Ok(JSend::success(response))
}

pub async fn update_unit(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
    AppJson(unit): AppJson<Unit>,
) -> Result<Json<JSend<UnitsResponse>>, ApiError> {
    let response = edit_units(&state, &id, move |kind, units| {
        validate_units(kind, std::slice::from_ref(&unit))?;
        Ok(units.update(index, unit)?)
    })
    .await?;
    Ok(JSend::success(response))
}

pub async fn remove_unit(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<JSend<UnitsResponse>>, ApiError> {
    let response = edit_units(&state, &id, |_, units| {
        units.remove(index)?;
        Ok(())
    })
    .await?;

    tracing::debug!(draft_id = %id, index, "Removed unit");
    Ok(JSend::success(response))
}

/// Edit a copy of the draft's units and store it only if `f` succeeds.
async fn edit_units<F>(state: &AppState, id: &str, f: F) -> Result<UnitsResponse, ApiError>
where
    F: FnOnce(PropertyKind, &mut UnitsList) -> Result<(), ApiError>,
{
    let draft = load_draft(state, id)?;
    let mut units = draft.units.clone();
    f(draft.property_kind, &mut units)?;

    let draft = state
        .db
        .modify_draft(id, |draft| draft.units = units)?
        .ok_or_else(|| ApiError::not_found("Draft not found"))?;

    Ok(UnitsResponse {
        units: draft.units.as_slice().to_vec(),
    })
}

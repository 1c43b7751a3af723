mod admin;
mod drafts;
mod images;
mod markers;
mod previews;
mod units;

use crate::api::response::ApiError;
use crate::storage::models::DraftRecord;
use crate::AppState;

pub use admin::{admin_purge, health};
pub use drafts::{create_draft, delete_draft, get_draft, list_drafts, submit_draft, update_draft};
pub use images::{
    add_images, clear_images, list_images, normalize_images, remove_image, set_primary_image,
    update_image,
};
pub use markers::list_markers;
pub use previews::get_image_file;
pub use units::{add_unit, remove_unit, update_unit};

/// Fetch a draft or fail with 404.
fn load_draft(state: &AppState, id: &str) -> Result<DraftRecord, ApiError> {
    state
        .db
        .get_draft(id)?
        .ok_or_else(|| ApiError::not_found("Draft not found"))
}

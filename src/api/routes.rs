use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let images = &state.config.images;
    // A single request may carry every image a draft is allowed to hold.
    let upload_limit = (images.max_upload_size as usize)
        .saturating_mul(images.max_images_per_draft)
        .saturating_add(64 * 1024);

    let mut router = Router::new()
        // Drafts
        .route("/drafts", get(handlers::list_drafts))
        .route("/drafts", post(handlers::create_draft))
        .route("/drafts/:id", get(handlers::get_draft))
        .route("/drafts/:id", put(handlers::update_draft))
        .route("/drafts/:id", delete(handlers::delete_draft))
        .route("/drafts/:id/submit", post(handlers::submit_draft))
        // Images
        .route("/drafts/:id/images", get(handlers::list_images))
        .route(
            "/drafts/:id/images",
            post(handlers::add_images).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/drafts/:id/images", delete(handlers::clear_images))
        .route("/drafts/:id/images/normalize", post(handlers::normalize_images))
        .route("/drafts/:id/images/:index", patch(handlers::update_image))
        .route("/drafts/:id/images/:index", delete(handlers::remove_image))
        .route("/drafts/:id/images/:index/primary", put(handlers::set_primary_image))
        .route("/drafts/:id/files/:image_id", get(handlers::get_image_file))
        // Units
        .route("/drafts/:id/units", post(handlers::add_unit))
        .route("/drafts/:id/units/:index", put(handlers::update_unit))
        .route("/drafts/:id/units/:index", delete(handlers::remove_unit))
        // Map
        .route("/markers", get(handlers::list_markers))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled, purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

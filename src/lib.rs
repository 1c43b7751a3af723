//! listing-drafts - Staging service for property listing drafts
//!
//! This crate lets back-office users prepare a listing before it is published:
//! - Draft listings (houses, lands) persisted in redb
//! - Image sets whose file bytes stay in memory while their metadata ledger
//!   is persisted with the draft
//! - Unit/specification rows with a never-empty invariant
//! - Submission to the listing backend as a single multipart request
//! - Map markers for drafts, exact or approximated from the state

pub mod api;
pub mod backend;
pub mod config;
pub mod images;
pub mod listing;
pub mod markers;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod units;
pub mod workspace;

use std::sync::Arc;

use config::Config;
use storage::Database;
use workspace::Workspace;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub workspace: Workspace,
    pub backend: Arc<dyn backend::ListingBackend>,
}

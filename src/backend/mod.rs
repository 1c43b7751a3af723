mod http;

pub use http::{build_form, HttpBackend};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::images::SubmissionField;
use crate::units::PropertyKind;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Transport(String),
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid backend response: {0}")]
    Decode(String),
}

/// Envelope returned by the listing backend for every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl BackendResponse {
    /// Listing id reported back by the backend, if any.
    pub fn listing_id(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        let id = data.get("id").or_else(|| data.get("_id"))?;
        match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Where a draft is submitted: a new listing, or an update of an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTarget {
    pub property_kind: PropertyKind,
    pub remote_id: Option<String>,
}

impl SubmissionTarget {
    /// Path relative to the backend base URL.
    pub fn path(&self) -> String {
        match &self.remote_id {
            Some(id) => format!("/{}/{id}", self.property_kind.collection()),
            None => format!("/{}", self.property_kind.collection()),
        }
    }

    pub fn is_update(&self) -> bool {
        self.remote_id.is_some()
    }
}

/// The listing REST backend that receives submitted drafts.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    async fn submit(
        &self,
        target: &SubmissionTarget,
        fields: Vec<SubmissionField>,
    ) -> Result<BackendResponse, BackendError>;
}

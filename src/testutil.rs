//! Shared test helpers for listing-drafts handler tests.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, Request};

use crate::backend::{BackendError, BackendResponse, ListingBackend, SubmissionTarget};
use crate::config::{BackendConfig, Config, ImageConfig, ServerConfig};
use crate::images::{PrimaryPolicy, SubmissionField};
use crate::storage::Database;
use crate::workspace::Workspace;
use crate::AppState;

const BOUNDARY: &str = "listing-drafts-test-boundary";

/// Backend double that records every submission and answers with a canned
/// response.
pub struct RecordingBackend {
    pub calls: Mutex<Vec<(SubmissionTarget, Vec<SubmissionField>)>>,
    response: Mutex<Result<BackendResponse, (u16, String)>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Mutex::new(Ok(BackendResponse {
                success: true,
                message: "Listing saved".to_string(),
                data: Some(serde_json::json!({ "id": "listing-1" })),
            })),
        }
    }

    pub fn respond_with(&self, response: BackendResponse) {
        *self.response.lock().unwrap() = Ok(response);
    }

    pub fn fail_with_status(&self, status: u16, message: &str) {
        *self.response.lock().unwrap() = Err((status, message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(SubmissionTarget, Vec<SubmissionField>)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ListingBackend for RecordingBackend {
    async fn submit(
        &self,
        target: &SubmissionTarget,
        fields: Vec<SubmissionField>,
    ) -> Result<BackendResponse, BackendError> {
        self.calls.lock().unwrap().push((target.clone(), fields));
        match &*self.response.lock().unwrap() {
            Ok(response) => Ok(response.clone()),
            Err((status, message)) => Err(BackendError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Backend that signals `entered` when a submission arrives and answers only
/// after `release` is notified, so tests can act while a submit is in flight.
pub struct GatedBackend {
    pub entered: Notify,
    pub release: Notify,
    response: BackendResponse,
}

impl GatedBackend {
    pub fn new(response: BackendResponse) -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
            response,
        }
    }
}

#[async_trait]
impl ListingBackend for GatedBackend {
    async fn submit(
        &self,
        _target: &SubmissionTarget,
        _fields: Vec<SubmissionField>,
    ) -> Result<BackendResponse, BackendError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }
}

pub fn test_config(temp_dir: &tempfile::TempDir) -> Config {
    Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: temp_dir.path().join("data").to_string_lossy().to_string(),
        },
        backend: BackendConfig::default(),
        images: ImageConfig {
            max_upload_size: 1024 * 1024, // 1MB for tests
            max_images_per_draft: 5,
            primary_on_remove: PrimaryPolicy::Leave,
        },
        test_mode: true,
    }
}

/// Create a test AppState with a temporary database and a recording backend.
pub fn test_state(temp_dir: &tempfile::TempDir) -> (Arc<AppState>, Arc<RecordingBackend>) {
    test_state_with(test_config(temp_dir))
}

pub fn test_state_with(config: Config) -> (Arc<AppState>, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::new());
    let state = test_state_with_backend(config, Arc::clone(&backend) as Arc<dyn ListingBackend>);
    (state, backend)
}

pub fn test_state_with_backend(config: Config, backend: Arc<dyn ListingBackend>) -> Arc<AppState> {
    let db = Database::open(&config.server.data_dir).expect("Failed to open test database");
    let workspace = Workspace::new(config.images.primary_on_remove);

    Arc::new(AppState {
        config,
        db,
        workspace,
        backend,
    })
}

/// Build a `Multipart` extractor from `(field name, filename, content type, bytes)` parts.
pub async fn multipart(parts: &[(&str, &str, &str, &[u8])]) -> Multipart {
    let mut body: Vec<u8> = Vec::new();
    for (name, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Failed to build multipart request");

    Multipart::from_request(request, &())
        .await
        .expect("Failed to build multipart extractor")
}

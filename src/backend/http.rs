use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{BackendError, BackendResponse, ListingBackend, SubmissionTarget};
use crate::images::{FieldValue, SubmissionField};

/// Listing backend reached over HTTP with multipart/form-data bodies.
pub struct HttpBackend {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: token.map(|s| s.to_string()),
        })
    }

    fn url(&self, target: &SubmissionTarget) -> String {
        format!("{}{}", self.base_url, target.path())
    }
}

/// Convert submission fields into a reqwest form, preserving part order.
pub fn build_form(fields: Vec<SubmissionField>) -> Result<Form, BackendError> {
    let mut form = Form::new();
    for field in fields {
        form = match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::File(file) => {
                let part = Part::bytes(file.data.to_vec())
                    .file_name(file.filename)
                    .mime_str(&file.content_type)
                    .map_err(|e| BackendError::Transport(format!("invalid content type: {e}")))?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl ListingBackend for HttpBackend {
    async fn submit(
        &self,
        target: &SubmissionTarget,
        fields: Vec<SubmissionField>,
    ) -> Result<BackendResponse, BackendError> {
        let form = build_form(fields)?;
        let url = self.url(target);

        let mut request = if target.is_update() {
            self.client.put(&url)
        } else {
            self.client.post(&url)
        };
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        tracing::debug!(url = %url, status = %status, "Backend responded");

        match serde_json::from_str::<BackendResponse>(&body) {
            // Error statuses still carry the backend's message when the body is
            // a regular envelope.
            Ok(envelope) if status.is_success() => Ok(envelope),
            Ok(envelope) => Err(BackendError::Status {
                status: status.as_u16(),
                message: envelope.message,
            }),
            Err(_) if !status.is_success() => Err(BackendError::Status {
                status: status.as_u16(),
                message: body,
            }),
            Err(e) => Err(BackendError::Decode(e.to_string())),
        }
    }
}

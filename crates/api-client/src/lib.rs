/// HTTP client for the cutter backend: project creation and segment export.
///
/// The client does not interpret server results beyond success/failure; a
/// non-success status surfaces as an opaque error carrying the body text.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use session::CutList;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreated {
    pub project_id: String,
}

/// One entry of the export payload's `segments` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSegment {
    pub start_s: f64,
    pub end_s: f64,
    pub filename: String,
}

/// Export payload: the cut list serialized in its current order, plus the
/// externally supplied bitrate (not validated here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub segments: Vec<ExportSegment>,
    pub bitrate_kbps: u32,
}

impl ExportRequest {
    pub fn from_cuts(cuts: &CutList, bitrate_kbps: u32) -> Self {
        Self {
            segments: cuts
                .cuts()
                .iter()
                .map(|cut| ExportSegment {
                    start_s: cut.start_s,
                    end_s: cut.end_s,
                    filename: cut.filename.clone(),
                })
                .collect(),
            bitrate_kbps,
        }
    }
}

/// Whatever the server reported for an export; passed through verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportReport(pub Value);

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Streaming URL for a project's audio, for the visualization component.
    pub fn audio_url(&self, project_id: &str) -> String {
        format!("{}/api/projects/{}/audio", self.base_url, project_id)
    }

    /// Upload an audio file and create a project around it.
    pub async fn create_project(&self, path: &Path) -> Result<ProjectCreated, ApiError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = bytes.len(), "uploading project audio");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/projects", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Export the queued segments server-side.
    pub async fn export(
        &self,
        project_id: &str,
        request: &ExportRequest,
    ) -> Result<ExportReport, ApiError> {
        debug!(project_id, segments = request.segments.len(), "exporting");

        let response = self
            .client
            .post(format!("{}/api/projects/{}/export", self.base_url, project_id))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Delete a project and its stored files.
    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/api/projects/{}", self.base_url, project_id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

//! ImageApiV1: reqwest implementation of `ImageApi` for the PixelDock backend.

use std::time::Duration;

use super::{
    HealthStatus, ImageApi, UploadFile, UploadResponse, FILE_FIELD, HEALTH_PATH, UPLOAD_PATH,
};
use crate::error::AppError;
use crate::models::settings::ClientSettings;

pub struct ImageApiV1 {
    client: reqwest::Client,
    base_url: String,
}

impl ImageApiV1 {
    pub fn new(settings: &ClientSettings) -> crate::error::Result<Self> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::Config("baseUrl must not be empty".into()));
        }

        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pull the `message` field out of an error response body, if it is JSON.
    /// Separated as pub(crate) for unit testing without network.
    pub(crate) fn extract_error_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(|m| m.to_string())
    }
}

impl ImageApi for ImageApiV1 {
    async fn upload_image(&self, file: UploadFile) -> crate::error::Result<UploadResponse> {
        let mime = file.mime_type().to_string();
        let size = file.data.len();
        let file_name = file.file_name;

        let part = reqwest::multipart::Part::bytes(file.data)
            .file_name(file_name.clone())
            .mime_str(&mime)
            .map_err(|e| AppError::Internal(format!("MIME parse error: {}", e)))?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

        let url = self.endpoint(UPLOAD_PATH);
        log::debug!("POST {} file={} size={} mime={}", url, file_name, size, mime);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let response_message = Self::extract_error_message(&body);
            log::warn!(
                "Upload of '{}' failed: status={}, message={:?}",
                file_name,
                status,
                response_message
            );
            return Err(AppError::Transport {
                status: Some(status.as_u16()),
                response_message,
                detail: format!("upload failed with HTTP status {}", status),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::transport(format!("Failed to parse upload response: {}", e))
        })
    }

    async fn health(&self) -> crate::error::Result<HealthStatus> {
        let health = self
            .client
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;
        Ok(health)
    }
}

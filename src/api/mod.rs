//! PixelDock image backend API abstraction.
//!
//! `ImageApi` is the only interface through which the crate talks HTTP to the
//! backend. The store and the CLI call through this trait and never build
//! requests themselves, so a backend change stays inside `api/`.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::image::ImageMetadata;

pub const UPLOAD_PATH: &str = "/api/images/upload";
pub const HEALTH_PATH: &str = "/api/images/health";
/// Multipart field name the backend reads the image from.
pub const FILE_FIELD: &str = "file";

/// An image to upload. Content is forwarded as-is; nothing is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Io(format!("Invalid file name: {}", path.display())))?
            .to_string();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Self::from_bytes(file_name, data))
    }

    /// Declared content type, else a guess from the extension.
    pub fn mime_type(&self) -> &str {
        if let Some(ct) = self.content_type.as_deref() {
            return ct;
        }
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("svg") => "image/svg+xml",
            Some("tif") | Some("tiff") => "image/tiff",
            Some("ico") => "image/x-icon",
            Some("avif") => "image/avif",
            _ => "application/octet-stream",
        }
    }
}

/// Body of a 2xx upload response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    /// Only read when `success` is false; a non-string value is dropped.
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ImageMetadata>,
}

fn string_or_none<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }
}

/// Abstraction over the PixelDock image backend.
///
/// Uses return-position `impl Future` so implementations can be plain
/// `async fn`s; the trait is therefore not object-safe and is used generically.
pub trait ImageApi: Send + Sync {
    /// POST the file as multipart/form-data (single part named `file`).
    ///
    /// Returns the decoded body of a 2xx response, whatever its `success` flag.
    /// Connection failures, timeouts, non-2xx statuses and undecodable bodies are
    /// `AppError::Transport`.
    fn upload_image(
        &self,
        file: UploadFile,
    ) -> impl std::future::Future<Output = Result<UploadResponse>> + Send;

    /// Probe the backend health endpoint.
    fn health(&self) -> impl std::future::Future<Output = Result<HealthStatus>> + Send;
}

pub mod v1;

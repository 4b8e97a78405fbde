//! `pixeldock upload`: push files through the store one by one.

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::api::{ImageApi, UploadFile};
use crate::models::image::{ImageMetadata, UploadRecord};
use crate::services::notifier::Notifier;
use crate::services::upload_store::{resolve_error_message, UploadStore};

#[derive(Debug, Default)]
pub struct UploadSummary {
    pub uploaded: Vec<ImageMetadata>,
    /// Path and displayed error message of each failed file.
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upload `paths` sequentially. A failure does not stop the remaining files.
pub async fn upload_files<A: ImageApi, N: Notifier>(
    store: &UploadStore<A, N>,
    paths: &[PathBuf],
) -> UploadSummary {
    let mut summary = UploadSummary::default();
    for path in paths {
        match upload_one(store, path).await {
            Ok(data) => summary.uploaded.push(data),
            Err(message) => summary.failed.push((path.clone(), message)),
        }
    }
    summary
}

async fn upload_one<A: ImageApi, N: Notifier>(
    store: &UploadStore<A, N>,
    path: &Path,
) -> Result<ImageMetadata, String> {
    let file = UploadFile::from_path(path).await.map_err(|e| e.to_string())?;
    store
        .upload_image(file)
        .await
        .map_err(|e| resolve_error_message(&e))
}

/// One history line: time, id, original name and URL.
pub fn format_record(record: &UploadRecord) -> String {
    let meta = record.metadata();
    format!(
        "{}  #{}  {}  {}",
        record
            .upload_time()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        record.id().unwrap_or_else(|| "-".into()),
        meta.original_file_name()
            .or_else(|| meta.file_name())
            .unwrap_or("-"),
        meta.file_url().unwrap_or("-"),
    )
}

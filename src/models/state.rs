use serde::Serialize;

use super::image::UploadRecord;

/// Observable state of an upload store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    /// Completed uploads, most recent first.
    #[serde(rename = "uploadHistory")]
    pub history: Vec<UploadRecord>,
    /// True only while an upload request is in flight.
    pub is_loading: bool,
    /// Empty when no error is pending.
    pub error_message: String,
}

impl UploadState {
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

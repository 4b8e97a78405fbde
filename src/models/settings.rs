use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_USER_AGENT: &str = concat!("PixelDockUploader/", env!("CARGO_PKG_VERSION"));

/// How the store treats an upload call made while another is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadPolicy {
    /// Calls are not serialized; overlapping uploads share the loading and error
    /// fields and the last one to settle wins.
    #[default]
    Concurrent,
    /// Overlapping calls are rejected with `AppError::Busy`.
    SingleFlight,
}

/// Client settings persisted to a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Backend origin, e.g. `http://localhost:8080`. API paths are appended.
    pub base_url: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub upload_policy: UploadPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            upload_policy: UploadPolicy::default(),
        }
    }
}

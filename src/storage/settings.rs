use std::path::Path;

use crate::error::AppError;
use crate::models::settings::ClientSettings;

/// Environment variable overriding `baseUrl`.
pub const BASE_URL_ENV: &str = "PIXELDOCK_BASE_URL";

/// Read client settings from a JSON file. Returns defaults if the file does not exist.
pub fn load_settings(path: &Path) -> crate::error::Result<ClientSettings> {
    if !path.exists() {
        log::debug!("No settings at {}, using defaults", path.display());
        return Ok(ClientSettings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Invalid settings file {}: {}", path.display(), e)))
}

/// Save client settings, creating parent directories as needed.
pub fn save_settings(path: &Path, settings: &ClientSettings) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Apply environment overrides on top of loaded settings.
pub fn apply_env_overrides(settings: &mut ClientSettings) {
    apply_base_url_override(settings, std::env::var(BASE_URL_ENV).ok());
}

fn apply_base_url_override(settings: &mut ClientSettings, value: Option<String>) {
    if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
        log::debug!("{} overrides baseUrl with {}", BASE_URL_ENV, url);
        settings.base_url = url;
    }
}

//! `pixeldock config`: show the resolved settings and optionally write them back.

use std::path::Path;

use crate::error::Result;
use crate::models::settings::ClientSettings;
use crate::storage::settings::save_settings;

/// Render `settings` as the JSON stored on disk. With `save`, also write them to `path`.
pub fn resolved_settings(path: &Path, settings: &ClientSettings, save: bool) -> Result<String> {
    if save {
        save_settings(path, settings)?;
        log::info!("Saved settings to {}", path.display());
    }
    Ok(serde_json::to_string_pretty(settings)?)
}

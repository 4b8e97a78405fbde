//! Data models shared across the crate: backend image metadata, upload
//! records, the store's observable state, and client settings.

pub mod image;
pub mod settings;
pub mod state;

pub use image::{ImageMetadata, UploadRecord};
pub use settings::{ClientSettings, UploadPolicy};
pub use state::UploadState;

//! Client-side upload store for the PixelDock image backend.
//!
//! ```no_run
//! use pixeldock_uploader::api::{v1::ImageApiV1, UploadFile};
//! use pixeldock_uploader::models::ClientSettings;
//! use pixeldock_uploader::services::{LogNotifier, UploadStore};
//!
//! # async fn demo() -> pixeldock_uploader::error::Result<()> {
//! let api = ImageApiV1::new(&ClientSettings::default())?;
//! let store = UploadStore::new(api, LogNotifier);
//! let data = store.upload_image(UploadFile::from_path("cat.png").await?).await?;
//! println!("uploaded {:?}, history: {}", data.id(), store.history().len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

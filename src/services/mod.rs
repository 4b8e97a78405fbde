//! Business logic layer.
//!
//! Holds the upload store and the notification sinks it reports to. Called by
//! the `commands` layer; delegates HTTP interactions to the `api` layer.

pub mod notifier;
pub mod upload_store;

pub use notifier::{ChannelNotifier, LogNotifier, Notification, NotificationLevel, Notifier};
pub use upload_store::{UploadStore, HISTORY_CLEARED_MESSAGE, UPLOAD_FAILED_MESSAGE};

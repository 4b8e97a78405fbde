//! Upload store: uploads images through an `ImageApi` and keeps the history,
//! loading flag and error message that a UI renders.
//!
//! State lives in a `tokio::sync::watch` channel. Readers either poll the
//! getters or `subscribe()` and await changes. Each mutation is applied with a
//! single `send_modify`, so subscribers never observe a half-applied update.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use crate::api::{ImageApi, UploadFile};
use crate::error::{AppError, Result};
use crate::models::image::{ImageMetadata, UploadRecord};
use crate::models::settings::UploadPolicy;
use crate::models::state::UploadState;
use crate::services::notifier::{Notification, Notifier};

/// Shown when a failed upload carries no message of its own.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";
/// Toast raised by `clear_history`.
pub const HISTORY_CLEARED_MESSAGE: &str = "Upload history cleared";

/// Message to display for a failed upload: the response-body message, else the
/// error's own message, else the fixed fallback.
pub fn resolve_error_message(err: &AppError) -> String {
    err.user_message()
        .unwrap_or(UPLOAD_FAILED_MESSAGE)
        .to_string()
}

pub struct UploadStore<A, N> {
    api: A,
    notifier: N,
    policy: UploadPolicy,
    state: watch::Sender<UploadState>,
    in_flight: AtomicBool,
}

impl<A: ImageApi, N: Notifier> UploadStore<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self::with_policy(api, notifier, UploadPolicy::default())
    }

    pub fn with_policy(api: A, notifier: N, policy: UploadPolicy) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            api,
            notifier,
            policy,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn history(&self) -> Vec<UploadRecord> {
        self.state.borrow().history.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error_message(&self) -> String {
        self.state.borrow().error_message.clone()
    }

    /// Upload one image and prepend the resulting record to the history.
    ///
    /// Sets the loading flag and clears the error message first. On success the
    /// raw backend `data` object is returned. On failure the error message is
    /// recorded and the error is returned as well. The loading flag is reset
    /// before either outcome reaches the caller, and also if this future is
    /// dropped before it settles.
    ///
    /// With `UploadPolicy::Concurrent`, overlapping calls are not serialized:
    /// they share the loading flag and error message, and whichever settles last
    /// wins. With `UploadPolicy::SingleFlight`, an overlapping call fails with
    /// `AppError::Busy` and leaves the state untouched.
    pub async fn upload_image(&self, file: UploadFile) -> Result<ImageMetadata> {
        let _flight = match self.policy {
            UploadPolicy::SingleFlight => Some(FlightGuard::acquire(&self.in_flight)?),
            UploadPolicy::Concurrent => None,
        };

        let file_name = file.file_name.clone();
        let loading = LoadingGuard::start(&self.state);

        match self.request_upload(file).await {
            Ok(data) => {
                let record = UploadRecord::from_metadata(&data, Utc::now());
                log::info!(
                    "Uploaded '{}' as image {:?} ({})",
                    file_name,
                    record.id(),
                    record.file_url().unwrap_or("no url")
                );
                loading.settle(|state| state.history.insert(0, record));
                Ok(data)
            }
            Err(err) => {
                let message = resolve_error_message(&err);
                log::error!("Upload of '{}' failed: {} (shown: {})", file_name, err, message);
                loading.settle(|state| state.error_message = message);
                Err(err)
            }
        }
    }

    async fn request_upload(&self, file: UploadFile) -> Result<ImageMetadata> {
        let response = self.api.upload_image(file).await?;
        if !response.success {
            return Err(AppError::Application(response.message.unwrap_or_default()));
        }
        response.data.ok_or_else(|| {
            AppError::Application("Upload response did not include image data".into())
        })
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error_message.clear());
    }

    /// Empty the history and raise a success notification. Loading flag and
    /// error message are left as they are.
    pub fn clear_history(&self) {
        self.state.send_modify(|state| state.history.clear());
        self.notifier
            .notify(Notification::success(HISTORY_CLEARED_MESSAGE));
    }

    /// Tear the store down. History is cleared and every subscription closes.
    pub fn close(self) {
        self.state.send_modify(|state| state.history.clear());
        log::debug!("Upload store closed");
    }
}

/// Holds `is_loading = true` for the lifetime of one upload attempt.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<UploadState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a watch::Sender<UploadState>) -> Self {
        state.send_modify(|s| {
            s.is_loading = true;
            s.error_message.clear();
        });
        Self { state, armed: true }
    }

    /// Apply the outcome and reset the loading flag in one update.
    fn settle(mut self, apply: impl FnOnce(&mut UploadState)) {
        self.armed = false;
        self.state.send_modify(|s| {
            apply(s);
            s.is_loading = false;
        });
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|s| s.is_loading = false);
        }
    }
}

struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

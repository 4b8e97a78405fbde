//! Application error type shared by the API, store and CLI layers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The backend processed the request and reported `success: false`.
    #[error("upload rejected by backend: {0}")]
    Application(String),

    /// The backend was unreachable, timed out, answered with a non-2xx status,
    /// or sent a body that could not be decoded.
    #[error("transport error: {detail}")]
    Transport {
        status: Option<u16>,
        /// `message` field found in the failure response body, if any.
        response_message: Option<String>,
        detail: String,
    },

    /// Rejected because another upload is still in flight (single-flight policy).
    #[error("an upload is already in progress")]
    Busy,

    #[error("io error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn transport(detail: impl Into<String>) -> Self {
        AppError::Transport {
            status: None,
            response_message: None,
            detail: detail.into(),
        }
    }

    /// Human-readable message for display, or `None` when the error carries none.
    ///
    /// A message nested in the failure response body wins over the error's own
    /// text. Transport diagnostics are not considered user-facing.
    pub fn user_message(&self) -> Option<&str> {
        let message = match self {
            AppError::Transport {
                response_message, ..
            } => response_message.as_deref(),
            AppError::Application(msg)
            | AppError::Io(msg)
            | AppError::Config(msg)
            | AppError::Internal(msg) => Some(msg.as_str()),
            AppError::Busy => None,
        };
        message.filter(|m| !m.is_empty())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport {
            status: err.status().map(|s| s.as_u16()),
            response_message: None,
            detail: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_response_body_message() {
        let err = AppError::Transport {
            status: Some(400),
            response_message: Some("file too large".into()),
            detail: "HTTP status client error (400 Bad Request)".into(),
        };
        assert_eq!(err.user_message(), Some("file too large"));
    }

    #[test]
    fn test_user_message_hides_transport_detail() {
        let err = AppError::transport("error sending request for url");
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn test_user_message_application_text() {
        let err = AppError::Application("only images allowed".into());
        assert_eq!(err.user_message(), Some("only images allowed"));
    }

    #[test]
    fn test_user_message_empty_strings_count_as_absent() {
        assert_eq!(AppError::Application(String::new()).user_message(), None);
        let err = AppError::Transport {
            status: Some(500),
            response_message: Some(String::new()),
            detail: "boom".into(),
        };
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn test_busy_has_no_user_message() {
        assert_eq!(AppError::Busy.user_message(), None);
        assert_eq!(AppError::Busy.to_string(), "an upload is already in progress");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: AppError = io.into();
        match err {
            AppError::Io(msg) => assert!(msg.contains("missing.png")),
            other => panic!("Expected AppError::Io, got: {:?}", other),
        }
    }

    #[test]
    fn test_is_transport() {
        assert!(AppError::transport("x").is_transport());
        assert!(!AppError::Application("x".into()).is_transport());
    }
}

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvaticaError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection '{0}' is closed")]
    ConnectionClosed(String),

    #[error("Operation '{operation}' timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AvaticaError>;

impl AvaticaError {
    /// Builds a `Server` error from a non-success response body.
    ///
    /// Avatica servers answer failures with an `ErrorResponse` document; when
    /// the body parses as one, its message (plus SQL state and vendor code when
    /// present) replaces the raw text.
    pub(crate) fn from_error_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|doc| {
                let text = doc.get("errorMessage")?.as_str()?.to_string();
                let mut details = Vec::new();
                if let Some(state) = doc.get("sqlState").and_then(|s| s.as_str()) {
                    details.push(format!("sqlState={}", state));
                }
                if let Some(code) = doc.get("errorCode").and_then(|c| c.as_i64()) {
                    details.push(format!("errorCode={}", code));
                }
                if details.is_empty() {
                    Some(text)
                } else {
                    Some(format!("{} ({})", text, details.join(", ")))
                }
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.to_string()
                }
            });

        AvaticaError::Server { status, message }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AvaticaError::Timeout { .. })
    }
}

impl serde::Serialize for AvaticaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

//! Errors returned by the simulation service client

use serde::Deserialize;

/// Request-level failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("request failed with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, when present
        message: Option<String>,
    },

    /// Connection, timeout or other transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Success status but the body could not be read
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Message to show to the user
    ///
    /// The server-supplied message when there is one, `fallback` otherwise.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Status code, if the server answered
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a status error from a raw failure body
    #[must_use]
    pub fn from_status_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error);
        Self::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Failure body: `{"error": "..."}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

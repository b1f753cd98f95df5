use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the credential; the local session is gone.
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// No response was received. Passed through from reqwest untouched.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The session changed while the call was in flight; its result was dropped.
    #[error("Session ended while the request was in flight - please sign in again")]
    StaleSession,
}

impl ApiError {
    /// Build the failure for a non-ok status from the (optional) parsed body.
    pub fn from_status(status: reqwest::StatusCode, body: Option<&Value>) -> Self {
        let message = body
            .and_then(extract_message)
            .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));
        match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            code => ApiError::RequestFailed {
                status: code,
                message,
            },
        }
    }

    /// HTTP status carried by this error, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// The body's `message` field, if it is a usable string.
fn extract_message(body: &Value) -> Option<String> {
    let message = body.get("message")?.as_str()?;
    if message.is_empty() {
        return None;
    }
    Some(message.to_string())
}

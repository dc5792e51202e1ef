use serde_json::Value;
use thiserror::Error;

/// The single failure type surfaced by [`ApiClient`](super::ApiClient).
///
/// `Display` is always the human-readable message. For `Unauthorized` and
/// `Request` that is exactly the server's `error` text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not store session: {0}")]
    Storage(String),
}

/// Maximum length for server error messages
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a server message to avoid logging excessive data
    fn truncate_message(message: &str) -> String {
        if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
            return message.to_string();
        }
        let mut end = MAX_ERROR_MESSAGE_LENGTH;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &message[..end],
            message.len()
        )
    }

    /// Build the failure for a non-2xx response.
    ///
    /// `body` is the decoded response body when it was valid JSON. The
    /// message comes from its `error` field; when that is missing or empty
    /// `fallback` is used, followed by the status code.
    pub fn from_status(status: u16, body: Option<&Value>, fallback: &str) -> Self {
        let message = body
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(Self::truncate_message)
            .unwrap_or_else(|| format!("{} (HTTP {})", fallback, status));

        match status {
            401 => ApiError::Unauthorized(message),
            _ => ApiError::Request { status, message },
        }
    }

    /// Whether this failure means the credential is missing, invalid or expired.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated | ApiError::Unauthorized(_))
    }

    /// HTTP status of the response that produced this failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

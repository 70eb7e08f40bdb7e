use thiserror::Error;

/// Errors returned by the ordering backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401/403: the token is missing, expired or not allowed here.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16, message: Option<String> },

    /// Any other non-success answer: a non-2xx status, or a 2xx envelope whose
    /// `status` is not `"success"`.
    #[error("request rejected (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The `message` field the backend attached to its answer, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Rejected { status, .. } => {
                Some(*status)
            }
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

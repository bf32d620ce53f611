//! Error types for Microsoft Graph operations.

use thiserror::Error;
use utils::UtilsError;

/// Result type for Graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while talking to Microsoft Graph or the token endpoint.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] UtilsError),

    /// Graph answered with a non-success status.
    #[error("Graph API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Token acquisition failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Graph answered with a body we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GraphError {
    /// HTTP status of an API failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from authentication or authorization.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, GraphError::Auth(_))
            || matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Http(UtilsError::HttpError(err))
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::InvalidResponse(err.to_string())
    }
}

//! Error types for gcpadmin
//!
//! Every fallible operation in the library returns [`AdminError`]. Provider
//! error responses are classified into [`AdminError::Api`] with the message
//! already pulled out of the `{"error": {"message": ...}}` envelope.

use thiserror::Error;

/// Library error type
#[derive(Error, Debug)]
pub enum AdminError {
    /// Ambient credentials are missing or unusable
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An API client could not be built
    #[error("Failed to construct {api} client: {reason}")]
    ClientConstruction { api: &'static str, reason: String },

    /// The provider answered with a non-success status
    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parent reference that is neither a folder nor an organization
    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    /// A required field was absent from a provider payload
    #[error("Response is missing field '{0}'")]
    MissingField(&'static str),

    /// A media download stopped short of the advertised size
    #[error("Download ended at {received} of {expected} bytes")]
    IncompleteDownload { received: u64, expected: u64 },
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    /// HTTP status of a provider error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Api { status, .. } => Some(*status),
            AdminError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AdminError::Authentication(_))
            || matches!(self.status(), Some(401) | Some(403))
    }
}

/// Format an error for display on a terminal
///
/// Known HTTP statuses get a short hint instead of the raw provider message.
pub fn format_gcp_error(error: &AdminError) -> String {
    match error.status() {
        Some(401) => {
            "Authentication failed. Run 'gcloud auth application-default login'.".to_string()
        },
        Some(403) => "Permission denied. Check your GCP IAM permissions.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(409) => "Resource conflict. The resource may already exist.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(500) | Some(503) => {
            "GCP service temporarily unavailable. Please try again.".to_string()
        },
        _ => match error {
            AdminError::Authentication(_) => format!(
                "{}. Run 'gcloud auth application-default login'.",
                error
            ),
            _ => error.to_string(),
        },
    }
}

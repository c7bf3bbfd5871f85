//! GitHub API error types

use std::time::Duration;
use thiserror::Error;

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Octocrab library error that carries no status worth classifying
    #[error("Octocrab error: {0}")]
    Octocrab(#[source] octocrab::Error),

    /// Generic GitHub API error (5xx and other unexpected statuses)
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource exists but the credentials may not see it (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Authentication required or failed (401)
    #[error("Authentication required")]
    AuthRequired,

    /// Primary or secondary rate limit hit (429, or 403 with a rate-limit message)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The call did not complete within its budget
    #[error("Operation timed out: {operation} after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// The spawned request task went away before answering
    #[error("Request task cancelled")]
    TaskCancelled,

    /// Client setup/configuration error
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Convenience result alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

impl GitHubError {
    /// Repo missing or hidden from the current credentials.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, GitHubError::NotFound(_) | GitHubError::Forbidden(_))
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GitHubError::RateLimitExceeded)
    }

    /// Classify a raw HTTP status and message the way GitHub reports them.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => GitHubError::AuthRequired,
            404 => GitHubError::NotFound(message),
            429 => GitHubError::RateLimitExceeded,
            403 if message.to_lowercase().contains("rate limit") => {
                GitHubError::RateLimitExceeded
            }
            403 => GitHubError::Forbidden(message),
            _ => GitHubError::Api { status, message },
        }
    }
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                GitHubError::from_status(source.status_code.as_u16(), source.message.clone())
            }
            other => GitHubError::Octocrab(other),
        }
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for GitHubError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        GitHubError::TaskCancelled
    }
}

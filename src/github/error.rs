use thiserror::Error;

/// Errors from the GitHub REST API.
///
/// SECURITY: Error messages must NEVER contain the access token.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// No token was configured, so no authenticated call can be made
    #[error("GitHub client not initialized - token may be missing")]
    MissingToken,

    /// Token rejected or lacking permissions (401/403)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

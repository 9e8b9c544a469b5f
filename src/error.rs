//! Error taxonomy shared by every pipeline stage.
//!
//! Each variant renders as the `error` text of a failure record; a few also
//! carry a `details` line (see [`TriageError::details`]).

/// Everything that can go wrong between fetching an issue and caching its analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    /// The repository URL does not name a GitHub owner and repository.
    #[error("Invalid GitHub URL format")]
    InvalidUrl,
    /// The issue request exceeded its timeout.
    #[error("Request timeout - GitHub server took too long")]
    Timeout,
    /// The tracker answered the issue request with a non-200 status.
    #[error("GitHub API error: {0}")]
    Api(u16),
    /// The issue request failed below HTTP.
    #[error("Network error: {0}")]
    Network(String),
    /// Any other failure while fetching, e.g. an undecodable issue payload.
    #[error("{0}")]
    Unexpected(String),
    /// The model reply was not valid JSON.
    #[error("AI response parsing failed")]
    Parse,
    /// The model reply lacked one of the required analysis fields.
    #[error("Incomplete analysis response")]
    IncompleteResponse,
    /// The model reply had every field but one of them was malformed.
    #[error("Invalid analysis response")]
    InvalidAnalysis(String),
    /// The model call itself failed (transport, auth, quota).
    #[error("Analysis failed")]
    Model(String),
    /// Reading or writing a cache entry failed. Never propagated past the cache.
    #[error("Cache I/O error: {0}")]
    CacheIo(String),
}

impl TriageError {
    /// Optional second line explaining the failure, surfaced as `details`.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Parse => Some("Could not parse AI output as JSON".to_string()),
            Self::InvalidAnalysis(reason) | Self::Model(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

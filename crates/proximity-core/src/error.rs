//! Error types for Proximity Core
//!
//! Nothing here aborts a run: fetch failures and circle problems are
//! reported and recovered. Input problems surface as
//! [`crate::limits::ValidationError`].

use thiserror::Error;

/// Failure to retrieve a single author record from the provider.
///
/// Always recovered locally: the author simply contributes nothing to the
/// circle being expanded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Author not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Provider rate limit exceeded")]
    RateLimited,

    #[error("Malformed author record: {0}")]
    Malformed(String),

    #[error("Invalid author id: {0:?}")]
    InvalidId(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited => true,
            Self::Status { code, .. } => *code >= 500,
            Self::NotFound(_) | Self::Malformed(_) | Self::InvalidId(_) => false,
        }
    }
}

/// Recoverable, reported outcome of a circle expansion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircleError {
    #[error("Seeker record unavailable for {seeker}: {reason}")]
    SeekerUnavailable { seeker: String, reason: String },

    #[error("Circle level {0} is not valid for this operation")]
    InvalidLevel(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Network("reset".into()).is_transient());
        assert!(FetchError::RateLimited.is_transient());
        assert!(FetchError::Status {
            code: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!FetchError::Status {
            code: 400,
            message: String::new()
        }
        .is_transient());
        assert!(!FetchError::NotFound("1".into()).is_transient());
        assert!(!FetchError::Malformed("eof".into()).is_transient());
    }
}

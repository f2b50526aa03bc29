//! Provider setup errors

use thiserror::Error;

/// Result type alias for provider construction
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Errors raised while building a provider client
///
/// Per-author lookup failures are [`proximity_core::FetchError`] instead.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}

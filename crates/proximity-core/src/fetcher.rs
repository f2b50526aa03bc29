//! Author record fetcher trait definition

use crate::author::{Author, AuthorId};
use crate::error::FetchError;
use async_trait::async_trait;

/// Source of author records
///
/// Implementations must be safe to call concurrently: the expander shares
/// one instance across all batch workers.
#[async_trait]
pub trait AuthorFetcher: Send + Sync {
    /// Fetch a single author's profile and papers
    async fn fetch(&self, id: &AuthorId) -> Result<Author, FetchError>;

    /// Name of the provider, for logs
    fn provider_name(&self) -> &str {
        "unknown"
    }
}

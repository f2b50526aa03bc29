//! In-memory provider for testing

use async_trait::async_trait;
use proximity_core::{Author, AuthorFetcher, AuthorId, FetchError, Paper};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Provider serving scripted records and failures
///
/// Unknown ids fail with `NotFound`. Every call is counted.
pub struct MemoryProvider {
    responses: RwLock<HashMap<AuthorId, Result<Author, FetchError>>>,
    calls: RwLock<HashMap<AuthorId, usize>>,
    latency: Duration,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
            latency: Duration::ZERO,
        }
    }

    /// Simulated latency for every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, author: Author) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(author.author_id.clone(), Ok(author));
        }
    }

    pub fn insert_failure(&self, id: impl Into<AuthorId>, error: FetchError) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(id.into(), Err(error));
        }
    }

    /// Add an author with a single paper shared with `co_authors`
    pub fn with_author(self, id: &str, co_authors: &[&str]) -> Self {
        let mut authors = vec![id];
        authors.extend_from_slice(co_authors);
        self.insert(Author::new(id).with_paper(Paper::new(format!("{} et al.", id)).with_authors(authors)));
        self
    }

    pub fn with_failure(self, id: &str, error: FetchError) -> Self {
        self.insert_failure(id, error);
        self
    }

    /// Number of fetches made for `id`
    pub fn calls_for(&self, id: &str) -> usize {
        self.calls
            .read()
            .ok()
            .and_then(|calls| calls.get(&AuthorId::from(id)).copied())
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls
            .read()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorFetcher for MemoryProvider {
    async fn fetch(&self, id: &AuthorId) -> Result<Author, FetchError> {
        if id.is_empty() {
            return Err(FetchError::InvalidId(id.to_string()));
        }

        if let Ok(mut calls) = self.calls.write() {
            *calls.entry(id.clone()).or_default() += 1;
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let responses = self
            .responses
            .read()
            .map_err(|e| FetchError::Network(format!("Lock error: {}", e)))?;
        responses
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(id.to_string())))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

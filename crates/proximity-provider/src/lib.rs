//! Proximity Provider - Author record sources
//!
//! Implementations of [`proximity_core::AuthorFetcher`]: the Semantic
//! Scholar HTTP client and an in-memory provider for tests.

pub mod error;
pub mod memory;
pub mod retry;
pub mod semantic_scholar;

pub use error::{ProviderError, ProviderResult};
pub use memory::MemoryProvider;
pub use retry::RetryPolicy;
pub use semantic_scholar::{SemanticScholarClient, SemanticScholarConfig, DEFAULT_BASE_URL};

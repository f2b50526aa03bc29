//! Storage backend trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use proximity_core::{AuthorId, CircleResult, RunSummary, SocialGraph};

/// Durable home for circles, run summaries and graph snapshots,
/// keyed by seeker
#[async_trait]
pub trait CircleStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Circles
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a circle, replacing any earlier circle at the same level
    async fn save_circle(&self, seeker: &AuthorId, circle: &CircleResult) -> StorageResult<()>;

    /// Load the circle stored at `level`
    async fn load_circle(&self, seeker: &AuthorId, level: u32)
        -> StorageResult<Option<CircleResult>>;

    /// Levels stored for a seeker, ascending
    async fn list_levels(&self, seeker: &AuthorId) -> StorageResult<Vec<u32>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Runs
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the summary of the latest run for a seeker
    async fn save_summary(&self, summary: &RunSummary) -> StorageResult<()>;

    /// Load the latest run summary; `None` means no run has ever finished saving
    async fn load_summary(&self, seeker: &AuthorId) -> StorageResult<Option<RunSummary>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Graph
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the accumulated graph (replaces existing)
    async fn save_graph(&self, seeker: &AuthorId, graph: &SocialGraph) -> StorageResult<()>;

    async fn load_graph(&self, seeker: &AuthorId) -> StorageResult<Option<SocialGraph>>;
}

/// Turn an author id into something safe to embed in a file name or key.
///
/// ASCII letters, digits and `-` pass through; every other byte, `_`
/// included, becomes `_xx` (lowercase hex), so distinct ids never share a key.
pub fn sanitize_key(id: &AuthorId) -> String {
    let mut key = String::with_capacity(id.as_str().len());
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            key.push(byte as char);
        } else {
            key.push_str(&format!("_{:02x}", byte));
        }
    }
    key
}

//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::CircleStore;
use async_trait::async_trait;
use proximity_core::{AuthorId, CircleResult, RunSummary, SocialGraph};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend
///
/// Useful for testing and dry runs.
pub struct MemoryStore {
    circles: RwLock<HashMap<(AuthorId, u32), CircleResult>>,
    summaries: RwLock<HashMap<AuthorId, RunSummary>>,
    graphs: RwLock<HashMap<AuthorId, SocialGraph>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            circles: RwLock::new(HashMap::new()),
            summaries: RwLock::new(HashMap::new()),
            graphs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

#[async_trait]
impl CircleStore for MemoryStore {
    async fn save_circle(&self, seeker: &AuthorId, circle: &CircleResult) -> StorageResult<()> {
        let mut circles = self.circles.write().map_err(lock_error)?;
        circles.insert((seeker.clone(), circle.level()), circle.clone());
        Ok(())
    }

    async fn load_circle(
        &self,
        seeker: &AuthorId,
        level: u32,
    ) -> StorageResult<Option<CircleResult>> {
        let circles = self.circles.read().map_err(lock_error)?;
        Ok(circles.get(&(seeker.clone(), level)).cloned())
    }

    async fn list_levels(&self, seeker: &AuthorId) -> StorageResult<Vec<u32>> {
        let circles = self.circles.read().map_err(lock_error)?;
        let mut levels: Vec<u32> = circles
            .keys()
            .filter(|(id, _)| id == seeker)
            .map(|(_, level)| *level)
            .collect();
        levels.sort_unstable();
        Ok(levels)
    }

    async fn save_summary(&self, summary: &RunSummary) -> StorageResult<()> {
        let mut summaries = self.summaries.write().map_err(lock_error)?;
        summaries.insert(summary.seeker.clone(), summary.clone());
        Ok(())
    }

    async fn load_summary(&self, seeker: &AuthorId) -> StorageResult<Option<RunSummary>> {
        let summaries = self.summaries.read().map_err(lock_error)?;
        Ok(summaries.get(seeker).cloned())
    }

    async fn save_graph(&self, seeker: &AuthorId, graph: &SocialGraph) -> StorageResult<()> {
        let mut graphs = self.graphs.write().map_err(lock_error)?;
        graphs.insert(seeker.clone(), graph.clone());
        Ok(())
    }

    async fn load_graph(&self, seeker: &AuthorId) -> StorageResult<Option<SocialGraph>> {
        let graphs = self.graphs.read().map_err(lock_error)?;
        Ok(graphs.get(seeker).cloned())
    }
}

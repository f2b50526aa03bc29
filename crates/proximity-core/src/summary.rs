//! Run bookkeeping: what a circle run did, even when it found nothing

use crate::author::AuthorId;
use crate::circle::CircleStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Ulid);

impl RunId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one expansion run for a seeker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,

    pub seeker: AuthorId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeker_name: Option<String>,

    pub started_at: DateTime<Utc>,

    /// None while the run is still in progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-level counters, in level order
    #[serde(default)]
    pub circles: Vec<CircleStats>,

    /// Recoverable problems reported during the run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RunSummary {
    pub fn start(seeker: AuthorId) -> Self {
        Self {
            run_id: RunId::new(),
            seeker,
            seeker_name: None,
            started_at: Utc::now(),
            finished_at: None,
            circles: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record stats for a level, replacing any earlier entry for it
    pub fn record(&mut self, stats: CircleStats) {
        self.circles.retain(|c| c.level != stats.level);
        self.circles.push(stats);
        self.circles.sort_by_key(|c| c.level);
    }

    pub fn record_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn total_discovered(&self) -> usize {
        self.circles.iter().map(|c| c.discovered).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.circles.iter().map(|c| c.failed).sum()
    }

    /// Finished but nothing was discovered at any level
    pub fn is_empty_run(&self) -> bool {
        self.is_finished() && self.total_discovered() == 0
    }
}

//! Circle expansion: batched, paced, parallel co-author discovery

use crate::author::{Author, AuthorId};
use crate::circle::{CircleOutcome, CircleResult, CircleStats};
use crate::error::{CircleError, FetchError};
use crate::fetcher::AuthorFetcher;
use crate::graph::SocialGraph;
use crate::limits::{validate_batch_size, validate_workers, ValidationError};
use crate::rate_limit::RateLimit;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Tuning for circle expansion
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Authors fetched sequentially by one worker
    pub batch_size: usize,

    /// Batches allowed to run at once
    pub max_workers: usize,

    pub rate_limit: RateLimit,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_workers: 4,
            rate_limit: RateLimit::default(),
        }
    }
}

impl ExpansionConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_batch_size(self.batch_size)?;
        validate_workers(self.max_workers)?;
        Ok(())
    }
}

/// What one batch worker hands back to the coordinator
#[derive(Debug, Default)]
struct BatchOutput {
    size: usize,
    ids: BTreeSet<AuthorId>,
    fetched: usize,
    failed: usize,
    authors: Vec<Author>,
}

/// Tracks which authors have been expanded across levels
///
/// Each level only fetches the authors discovered at the previous level
/// that no earlier level has fetched. The seeker is never fetched again.
#[derive(Debug, Clone)]
pub struct Frontier {
    expanded: HashSet<AuthorId>,
}

impl Frontier {
    pub fn new(seeker: &AuthorId) -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(seeker.clone());
        Self { expanded }
    }

    /// Ids from `discovered` still to expand, marked as expanded
    pub fn advance(&mut self, discovered: impl IntoIterator<Item = AuthorId>) -> Vec<AuthorId> {
        discovered
            .into_iter()
            .filter(|id| self.expanded.insert(id.clone()))
            .collect()
    }

    pub fn is_expanded(&self, id: &AuthorId) -> bool {
        self.expanded.contains(id)
    }
}

/// Called by [`CircleExpander::expand_observed`] after each circle
///
/// The outcome has already been merged into the graph when this runs.
#[async_trait]
pub trait LevelObserver: Send {
    async fn level_complete(&mut self, outcome: &CircleOutcome);
}

#[async_trait]
impl LevelObserver for () {
    async fn level_complete(&mut self, _outcome: &CircleOutcome) {}
}

/// Expands a seeker's co-authorship network circle by circle
pub struct CircleExpander {
    fetcher: Arc<dyn AuthorFetcher>,
    config: ExpansionConfig,
}

impl CircleExpander {
    pub fn new(fetcher: Arc<dyn AuthorFetcher>, config: ExpansionConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Fetch the seeker's own record
    pub async fn fetch_seeker(&self, seeker: &AuthorId) -> Result<Author, FetchError> {
        match self.fetcher.fetch(seeker).await {
            Ok(author) => {
                tracing::info!(
                    "Fetched info for {}, with {} papers",
                    author.label(),
                    author.paper_count.unwrap_or(author.papers.len() as u32)
                );
                Ok(author)
            }
            Err(e) => {
                tracing::error!("Error fetching seeker info for {}: {}", seeker, e);
                Err(e)
            }
        }
    }

    /// Build circle 1 from the seeker's papers.
    ///
    /// A missing seeker record yields an empty circle and a reported error.
    pub fn expand_first_circle(&self, seeker_id: &AuthorId, seeker: Option<&Author>) -> CircleOutcome {
        let mut stats = CircleStats::new(1);

        let Some(seeker) = seeker else {
            let error = CircleError::SeekerUnavailable {
                seeker: seeker_id.to_string(),
                reason: "no record fetched".to_string(),
            };
            tracing::error!("Error building first circle: {}", error);
            stats.requested = 1;
            stats.failed = 1;
            return CircleOutcome {
                result: CircleResult::empty_first(),
                stats,
                authors: Vec::new(),
                error: Some(error),
            };
        };

        let mut result = CircleResult::from_seeker(seeker);
        if let CircleResult::First { papers } = &mut result {
            // The record may come back under a merged id; never list the requested one either.
            for paper in papers.iter_mut() {
                paper.co_authors.retain(|id| id != seeker_id);
            }
        }

        stats.requested = 1;
        stats.fetched = 1;
        stats.discovered = result.len();
        tracing::info!(
            "First circle of co-authors for {} stored: {} authors across {} papers",
            seeker_id,
            stats.discovered,
            seeker.papers.len()
        );

        CircleOutcome {
            result,
            stats,
            authors: Vec::new(),
            error: None,
        }
    }

    /// Build circle `level` (>= 2) from the authors of the previous circle.
    ///
    /// Batches run in parallel up to `max_workers`; fetches inside a batch
    /// are sequential and paced. Failed fetches contribute nothing.
    pub async fn expand_next_circle<I>(&self, seeker: &AuthorId, previous: I, level: u32) -> CircleOutcome
    where
        I: IntoIterator<Item = AuthorId>,
    {
        let mut stats = CircleStats::new(level);

        if level < 2 {
            return CircleOutcome {
                result: CircleResult::expanded(level, Vec::new()),
                stats,
                authors: Vec::new(),
                error: Some(CircleError::InvalidLevel(level)),
            };
        }

        let mut seen = HashSet::new();
        let pending: Vec<AuthorId> = previous
            .into_iter()
            .filter(|id| !id.is_empty() && id != seeker)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        stats.requested = pending.len();

        let batch_size = self.config.batch_size.max(1);
        let batches: Vec<Vec<AuthorId>> = pending.chunks(batch_size).map(|c| c.to_vec()).collect();
        tracing::info!(
            "Expanding circle {}: {} authors in {} batches ({} workers)",
            level,
            pending.len(),
            batches.len(),
            self.config.max_workers
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut tasks = JoinSet::new();

        for batch in batches {
            // Permits are taken in input order, so batches start in input order.
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Worker pool closed during circle {}: {}", level, e);
                    break;
                }
            };
            let fetcher = Arc::clone(&self.fetcher);
            let rate_limit = self.config.rate_limit;
            tasks.spawn(async move {
                let output = run_batch(fetcher, batch, rate_limit).await;
                drop(permit);
                output
            });
        }

        let mut ids = BTreeSet::new();
        let mut authors = Vec::new();
        let mut accounted = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(output) => {
                    accounted += output.size;
                    stats.fetched += output.fetched;
                    stats.failed += output.failed;
                    ids.extend(output.ids);
                    authors.extend(output.authors);
                }
                Err(e) => {
                    tracing::error!("Batch worker for circle {} did not complete: {}", level, e);
                }
            }
        }

        // Authors in batches that never reported back count as failed.
        stats.failed += stats.requested.saturating_sub(accounted);

        ids.remove(seeker);
        stats.discovered = ids.len();
        tracing::info!(
            "Circle {} complete: {} authors discovered ({} fetched, {} failed)",
            level,
            stats.discovered,
            stats.fetched,
            stats.failed
        );

        CircleOutcome {
            result: CircleResult::Expanded { level, ids },
            stats,
            authors,
            error: None,
        }
    }

    /// Run circles 1..=max_level, merging each into `graph` as it completes.
    ///
    /// Authors already expanded at an earlier level are not fetched again.
    /// Stops early once a level has nothing new to expand.
    pub async fn expand(
        &self,
        seeker_id: &AuthorId,
        seeker: Option<&Author>,
        max_level: u32,
        graph: &mut SocialGraph,
    ) -> Vec<CircleOutcome> {
        self.expand_observed(seeker_id, seeker, max_level, graph, &mut ())
            .await
    }

    /// Like [`expand`](Self::expand), handing each circle to `observer`
    /// before the next one starts.
    pub async fn expand_observed(
        &self,
        seeker_id: &AuthorId,
        seeker: Option<&Author>,
        max_level: u32,
        graph: &mut SocialGraph,
        observer: &mut dyn LevelObserver,
    ) -> Vec<CircleOutcome> {
        let mut outcomes = Vec::new();
        if max_level == 0 {
            return outcomes;
        }

        if let Some(author) = seeker {
            graph.merge_author(author);
        }
        let first = self.expand_first_circle(seeker_id, seeker);
        if first.result.is_empty() {
            tracing::warn!("First circle for {} is empty", seeker_id);
        }
        graph.merge_outcome(seeker_id, &first);
        observer.level_complete(&first).await;

        let mut frontier = Frontier::new(seeker_id);
        let mut pending = frontier.advance(first.result.author_ids());
        outcomes.push(first);

        for level in 2..=max_level {
            if pending.is_empty() {
                tracing::info!("Nothing left to expand at circle {}", level);
                break;
            }

            let outcome = self.expand_next_circle(seeker_id, pending, level).await;
            graph.merge_outcome(seeker_id, &outcome);
            observer.level_complete(&outcome).await;
            pending = frontier.advance(outcome.result.author_ids());
            outcomes.push(outcome);
        }

        outcomes
    }
}

async fn run_batch(
    fetcher: Arc<dyn AuthorFetcher>,
    batch: Vec<AuthorId>,
    rate_limit: RateLimit,
) -> BatchOutput {
    let mut pacer = rate_limit.pacer();
    let mut output = BatchOutput {
        size: batch.len(),
        ..Default::default()
    };

    for id in &batch {
        match fetcher.fetch(id).await {
            Ok(author) => {
                output.ids.extend(author.co_author_ids());
                output.fetched += 1;
                output.authors.push(author);
            }
            Err(e) => {
                tracing::warn!("Error fetching co-author info for {}: {}", id, e);
                output.failed += 1;
            }
        }
        pacer.tick().await;
    }
    pacer.finish().await;

    output
}

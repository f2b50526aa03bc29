//! Circles command

use anyhow::Context;
use async_trait::async_trait;
use clap::Args;

use crate::output::render_summary;
use crate::{AppContext, Cli};
use proximity_core::{
    AuthorId, CircleExpander, CircleOutcome, LevelObserver, RunSummary, SocialGraph,
};
use proximity_storage::CircleStore;

#[derive(Args)]
pub struct CirclesArgs {
    /// Seeker author id
    pub seeker: String,

    /// Deepest circle to build
    #[arg(short, long)]
    pub levels: Option<u32>,

    /// Authors fetched sequentially per batch
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Batches running at once
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Seconds to pause after each burst of requests
    #[arg(long)]
    pub min_interval_secs: Option<f64>,

    /// Requests per pause (default: one pause per batch)
    #[arg(long)]
    pub burst: Option<usize>,

    /// Derive the pause from a requests-per-second limit
    #[arg(long, conflicts_with = "min_interval_secs")]
    pub requests_per_second: Option<f64>,
}

pub async fn run(args: &CirclesArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let seeker = AuthorId::parse(&args.seeker)?;

    let mut section = ctx.config.expansion.clone();
    if let Some(levels) = args.levels {
        section.levels = levels;
    }
    if let Some(batch_size) = args.batch_size {
        section.batch_size = batch_size;
    }
    if let Some(workers) = args.workers {
        section.max_workers = workers;
    }
    if let Some(secs) = args.min_interval_secs {
        section.min_interval_secs = secs;
        section.requests_per_second = None;
    }
    if args.requests_per_second.is_some() {
        section.requests_per_second = args.requests_per_second;
    }
    if args.burst.is_some() {
        section.burst = args.burst;
    }
    let config = section.to_expansion_config()?;

    let expander = CircleExpander::new(ctx.fetcher()?, config);
    let summary = build_circles(&expander, ctx.store.as_ref(), &seeker, section.levels).await?;

    if summary.is_empty_run() {
        tracing::warn!("No co-authors found for {}", seeker);
    }
    tracing::info!("Results stored in {:?}", ctx.output_dir);
    println!("{}", render_summary(&summary, cli.format)?);
    Ok(())
}

/// Stores each circle as soon as the expander finishes it
struct StoreSink<'a> {
    store: &'a dyn CircleStore,
    seeker: &'a AuthorId,
    summary: &'a mut RunSummary,
}

#[async_trait]
impl LevelObserver for StoreSink<'_> {
    async fn level_complete(&mut self, outcome: &CircleOutcome) {
        self.summary.record(outcome.stats.clone());
        if let Some(error) = &outcome.error {
            self.summary.record_error(error);
        }

        let level = outcome.result.level();
        if let Err(e) = self.store.save_circle(self.seeker, &outcome.result).await {
            tracing::error!("Failed to store circle {} for {}: {}", level, self.seeker, e);
            self.summary.record_error(format!("circle {}: {}", level, e));
        }
    }
}

/// Expand circles 1..=levels, storing each circle as soon as it completes.
///
/// Failures along the way are recorded in the summary; only a failure to
/// store the summary itself is returned as an error.
pub async fn build_circles(
    expander: &CircleExpander,
    store: &dyn CircleStore,
    seeker: &AuthorId,
    levels: u32,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::start(seeker.clone());
    let mut graph = SocialGraph::new();

    let record = match expander.fetch_seeker(seeker).await {
        Ok(author) => {
            summary.seeker_name = author.name.clone();
            Some(author)
        }
        Err(e) => {
            summary.record_error(format!("seeker {}: {}", seeker, e));
            None
        }
    };

    let mut sink = StoreSink {
        store,
        seeker,
        summary: &mut summary,
    };
    expander
        .expand_observed(seeker, record.as_ref(), levels, &mut graph, &mut sink)
        .await;

    summary.finish();

    if let Err(e) = store.save_graph(seeker, &graph).await {
        tracing::error!("Failed to store graph for {}: {}", seeker, e);
        summary.record_error(format!("graph: {}", e));
    }
    store
        .save_summary(&summary)
        .await
        .with_context(|| format!("Failed to store run summary for {}", seeker))?;

    Ok(summary)
}

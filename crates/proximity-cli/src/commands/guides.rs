//! Guides command

use clap::Args;

use crate::output::render_guides;
use crate::{AppContext, Cli};
use proximity_core::limits::validate_max_hops;
use proximity_core::{AuthorId, Direction, GuideFinder, DEFAULT_MAX_HOPS};

#[derive(Args)]
pub struct GuidesArgs {
    /// Seeker author id (its graph must already be stored)
    pub seeker: String,

    /// Guide author ids to look for
    #[arg(required = true)]
    pub guides: Vec<String>,

    /// Longest path reported, in hops
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: usize,

    /// Only follow links from an author to their listed co-authors
    #[arg(long)]
    pub directed: bool,
}

pub async fn run(args: &GuidesArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let seeker = AuthorId::parse(&args.seeker)?;
    let guides = args
        .guides
        .iter()
        .map(String::as_str)
        .map(AuthorId::parse)
        .collect::<Result<Vec<_>, _>>()?;
    validate_max_hops(args.max_hops)?;

    let Some(graph) = ctx.store.load_graph(&seeker).await? else {
        anyhow::bail!(
            "No stored graph for {} in {}. Run `proximity circles {}` first.",
            seeker,
            ctx.output_dir.display(),
            seeker
        );
    };
    tracing::info!(
        "Loaded graph for {} ({} nodes, {} edges)",
        seeker,
        graph.node_count(),
        graph.edge_count()
    );

    let direction = if args.directed {
        Direction::Outgoing
    } else {
        Direction::Both
    };
    let report = GuideFinder::new(args.max_hops)
        .with_direction(direction)
        .find_guides(&graph, &seeker, &guides);

    println!("{}", render_guides(&report, &graph, cli.format)?);
    Ok(())
}

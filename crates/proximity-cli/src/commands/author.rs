//! Author command

use anyhow::Context;
use clap::Args;

use crate::output::render_author;
use crate::{AppContext, Cli};
use proximity_core::AuthorId;

#[derive(Args)]
pub struct AuthorArgs {
    /// Semantic Scholar author id
    pub id: String,
}

pub async fn run(args: &AuthorArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let id = AuthorId::parse(&args.id)?;
    let fetcher = ctx.fetcher()?;
    tracing::debug!("Fetching author {} from {}", id, fetcher.provider_name());

    let author = fetcher
        .fetch(&id)
        .await
        .with_context(|| format!("Failed to fetch author {}", id))?;

    println!("{}", render_author(&author, cli.format)?);
    Ok(())
}

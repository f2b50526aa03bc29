//! Proximity CLI - Co-authorship circles and guide paths from the command line

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{author, circles, completions, guides};
use config::{config_file_path, default_output_dir, Backend, ProximityConfig};
use output::OutputFormat;
use proximity_core::AuthorFetcher;
use proximity_provider::SemanticScholarClient;
use proximity_storage::{CircleStore, JsonFileStore};

#[derive(Parser)]
#[command(name = "proximity")]
#[command(
    author,
    version,
    about = "Map an author's co-authorship circles and find paths to guides"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for circle, summary and graph files
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    /// Semantic Scholar API key
    #[arg(
        long,
        env = "SEMANTIC_SCHOLAR_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    pub format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print one author profile
    Author(author::AuthorArgs),
    /// Build co-authorship circles around a seeker and store them
    Circles(circles::CirclesArgs),
    /// Find short paths from a seeker to guide authors
    Guides(guides::GuidesArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with resolved config and storage backend
pub struct AppContext {
    pub config: ProximityConfig,
    pub output_dir: PathBuf,
    pub store: Arc<dyn CircleStore>,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = ProximityConfig::load(&cli.config_path())?;
        if let Some(key) = &cli.api_key {
            config.provider.api_key = Some(key.clone());
        }
        if let Some(backend) = cli.backend {
            config.output.backend = backend;
        }

        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| config.output.dir.clone())
            .unwrap_or_else(default_output_dir);
        tracing::debug!("Using output directory: {:?}", output_dir);

        let store = open_store(config.output.backend, &output_dir)?;

        Ok(Self {
            config,
            output_dir,
            store,
        })
    }

    pub fn fetcher(&self) -> anyhow::Result<Arc<dyn AuthorFetcher>> {
        let client = SemanticScholarClient::new(self.config.provider_config())?;
        Ok(Arc::new(client))
    }
}

fn open_store(backend: Backend, dir: &Path) -> anyhow::Result<Arc<dyn CircleStore>> {
    match backend {
        Backend::Json => Ok(Arc::new(JsonFileStore::open(dir)?)),
        #[cfg(feature = "redb")]
        Backend::Redb => {
            std::fs::create_dir_all(dir)?;
            let db_path = dir.join("proximity.redb");
            tracing::debug!("Using database at: {:?}", db_path);
            Ok(Arc::new(proximity_storage::RedbStore::open(&db_path)?))
        }
        #[cfg(not(feature = "redb"))]
        Backend::Redb => anyhow::bail!("This build does not include the redb backend"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting proximity CLI");

    match &cli.command {
        Commands::Config(args) => commands::config::run(args, &cli)?,
        Commands::Completions(args) => completions::run(args)?,
        Commands::Author(args) => {
            let ctx = AppContext::new(&cli)?;
            author::run(args, &cli, &ctx).await?
        }
        Commands::Circles(args) => {
            let ctx = AppContext::new(&cli)?;
            circles::run(args, &cli, &ctx).await?
        }
        Commands::Guides(args) => {
            let ctx = AppContext::new(&cli)?;
            guides::run(args, &cli, &ctx).await?
        }
    }

    Ok(())
}

//! Config command for inspecting and creating the config file

use clap::{Args, Subcommand};

use crate::config::ProximityConfig;
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Initialize default config file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Path => run_path(cli),
        ConfigCommands::Show => run_show(cli),
        ConfigCommands::Init { force } => run_init(cli, *force),
    }
}

fn run_path(cli: &Cli) -> anyhow::Result<()> {
    println!("{}", cli.config_path().display());
    Ok(())
}

fn run_show(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.config_path();
    let mut config = ProximityConfig::load(&path)?;
    if let Some(key) = &cli.api_key {
        config.provider.api_key = Some(key.clone());
    }
    if let Some(backend) = cli.backend {
        config.output.backend = backend;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = Some(dir.clone());
    }

    println!("# {}", path.display());
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}

fn run_init(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let path = cli.config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    ProximityConfig::default().save(&path)?;
    println!("Created config file at {}", path.display());
    Ok(())
}

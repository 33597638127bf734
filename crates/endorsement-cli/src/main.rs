// CLI for replaying endorsement registry scripts

use clap::{Parser, Subcommand};
use endorsement_cli::commands;
use endorsement_registry::Identity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "endorse")]
#[command(about = "Endorsement registry operator tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a registry and replay an operation script against it
    Run {
        /// Registry config file
        #[arg(short, long, default_value = "registry.toml")]
        config: PathBuf,

        /// Operation script
        #[arg(short, long)]
        script: PathBuf,

        /// Identity creating the registry (controller unless the config names one)
        #[arg(long)]
        creator: Option<Identity>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a registry config and show the resolved settings
    CheckConfig {
        /// Registry config file
        #[arg(short, long, default_value = "registry.toml")]
        config: PathBuf,

        /// Identity creating the registry
        #[arg(long)]
        creator: Option<Identity>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            script,
            creator,
            json,
        } => {
            commands::run::run(&config, &script, creator, json)?;
        }
        Commands::CheckConfig { config, creator } => {
            commands::check_config::check_config(&config, creator)?;
        }
    }

    Ok(())
}

//! vvdata CLI - build and refresh the verse data repository from raw text.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod watcher;

#[derive(Parser)]
#[command(name = "vvdata")]
#[command(about = "Build and refresh the verse data repository from raw text")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root; relative config paths resolve against it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to the config file (defaults to $VVDATA_CONFIG or $VVEDATA_CONFIG, then
    /// tools/vvdata.toml, then tools/config.env)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config and the data directory layout
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Parse changed raw files and rebuild the index and manifest
    Update {
        /// Parse and report; do not write files
        #[arg(long)]
        dry_run: bool,

        /// Reprocess all raw files, ignoring recorded digests
        #[arg(long)]
        force_all: bool,

        /// Push after commit (overrides config)
        #[arg(long)]
        push: bool,
    },

    /// Watch the raw directory and update on every change
    Watch {
        /// Push after each commit (overrides config)
        #[arg(long)]
        push: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.root, yes).await?;
        }
        Commands::Update {
            dry_run,
            force_all,
            push,
        } => {
            let options = vvdata_store::UpdateOptions {
                dry_run,
                force_all,
                push,
            };
            commands::update::run(&cli.root, config, options).await?;
        }
        Commands::Watch { push } => {
            commands::watch::run(&cli.root, config, push).await?;
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "interflat")]
#[command(about = "Flattens inherited binding-interface members into self-contained declarations")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Flatten all candidate interfaces and write generated files
    Generate {
        /// Source directory to scan (overrides configuration)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewrite files even when content is unchanged
        #[arg(long)]
        force: bool,
    },

    /// Run a pass without writing and report stale outputs
    Check {
        /// Fail if any generated file is stale (useful for CI)
        #[arg(long)]
        fail_on_changes: bool,

        /// Dump the declaration snapshot as JSON instead of checking
        #[arg(long)]
        dump: bool,
    },
}

impl Cli {
    pub async fn execute(self, mut engine: Engine) -> Result<()> {
        // Ctrl-C arms the cooperative cancellation flag; the pass stops
        // between roots, never mid-root.
        let cancel = engine.cancel_flag();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        match self.command {
            Commands::Init { path, force } => engine.init(path, force).await,
            Commands::Generate {
                source,
                output,
                force,
            } => engine.generate(source, output, force).await,
            Commands::Check {
                fail_on_changes,
                dump,
            } => engine.check(fail_on_changes, dump).await,
        }
    }
}

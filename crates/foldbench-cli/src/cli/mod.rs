//! CLI for the foldbench comparison runner.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foldbench_core::config;

use commands::{run_compare, run_show_config, CompareArgs};

/// Top-level CLI for the foldbench comparison runner.
#[derive(Debug, Parser)]
#[command(name = "foldbench")]
#[command(
    about = "Compare RNA secondary-structure predictors over a corpus of sequences",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the comparison over every sequence file in the input directory.
    Run(CompareArgs),

    /// Show the config file location and the effective defaults.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run(args) => run_compare(&cfg, args).await?,
            CliCommand::Config => run_show_config(&cfg)?,
        }

        Ok(())
    }
}

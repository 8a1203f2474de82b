//! `foldbench run` – drive the predictor comparison over a corpus.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use foldbench_core::config::{FoldbenchConfig, RunConfig, ToolsConfig};
use foldbench_core::jobs::{self, ShardSpec};
use foldbench_core::pool;
use foldbench_core::report::Reporter;

/// Flags for one comparison run; unset values fall back to the config file.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Input directory of FASTA sequence files, one job per file.
    #[arg(short = 'i', long, value_name = "DIR")]
    pub indir: PathBuf,

    /// Output directory for per-job result bundles (created if missing).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Location of the ViennaRNA RNAsubopt program.
    #[arg(long, value_name = "PATH")]
    pub rnasubopt: Option<String>,

    /// Location of the trivial-safety classifier.
    #[arg(long, value_name = "PATH")]
    pub trivial_safety: Option<String>,

    /// Location of the safe-and-complete analyzer.
    #[arg(long, value_name = "PATH")]
    pub safe_complete: Option<String>,

    /// deltaEnergy parameter to pass to RNAsubopt.
    #[arg(short = 'e', long, value_name = "N")]
    pub delta_energy: Option<i32>,

    /// Shard number and total number of shards, e.g. 2:8 for shard 2 out of 8.
    #[arg(short = 'n', long, value_name = "I:C")]
    pub shard: Option<String>,

    /// Start from a clean state, without reading any existing results.
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Number of simultaneous worker jobs.
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// CPU-time budget for RNAsubopt in hours (0 = unlimited). On timeout
    /// the sequence is skipped.
    #[arg(short = 'u', long, value_name = "HOURS")]
    pub timeout: Option<f64>,
}

pub async fn run_compare(cfg: &FoldbenchConfig, args: CompareArgs) -> Result<()> {
    // A malformed shard spec aborts before any job is scheduled. It is
    // reported on the diagnostic stream and leaves the exit status alone.
    let shard = match args.shard.as_deref().map(str::parse::<ShardSpec>).transpose() {
        Ok(shard) => shard,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    let tools = cfg.tools.clone().unwrap_or_default();
    let run_cfg = RunConfig {
        tools: ToolsConfig {
            rnasubopt: args.rnasubopt.unwrap_or(tools.rnasubopt),
            trivial_safety: args.trivial_safety.unwrap_or(tools.trivial_safety),
            safe_complete: args.safe_complete.unwrap_or(tools.safe_complete),
        },
        input_dir: args.indir,
        output_dir: args.outdir,
        delta_energy: args.delta_energy.unwrap_or(cfg.delta_energy),
        shard,
        clean: args.clean,
        workers: args.workers.unwrap_or(cfg.workers).max(1),
        cpu_limit: RunConfig::cpu_limit_from_hours(args.timeout.unwrap_or(cfg.timeout_hours)),
    };

    std::fs::create_dir_all(&run_cfg.output_dir).with_context(|| {
        format!("create output directory {}", run_cfg.output_dir.display())
    })?;

    let all_jobs = jobs::enumerate_jobs(&run_cfg.input_dir, &run_cfg.output_dir)?;
    let total = all_jobs.len();
    let selected = match run_cfg.shard {
        Some(spec) => spec.select(all_jobs),
        None => all_jobs,
    };

    let mut reporter = Reporter::new(std::io::stdout(), std::io::stderr());
    reporter.startup(selected.len(), total, run_cfg.shard)?;
    reporter.header()?;

    let stats = pool::run_jobs(Arc::new(run_cfg), selected, &mut reporter).await?;
    tracing::info!(
        "run completed {} job(s), {} with errors",
        stats.jobs_run,
        stats.jobs_with_errors
    );
    Ok(())
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::jobs::ShardSpec;

/// Locations of the external predictor programs (optional section in config.toml).
///
/// Defaults assume the programs are on PATH, same as the original batch setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// ViennaRNA RNAsubopt binary (the fold-search producer).
    pub rnasubopt: String,
    /// Trivial-safety classifier consuming RNAsubopt output on stdin.
    pub trivial_safety: String,
    /// Safe-and-complete folding analyzer (also used for single-max-pairs).
    pub safe_complete: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            rnasubopt: "RNAsubopt".to_string(),
            trivial_safety: "trivialsafety".to_string(),
            safe_complete: "safecomplete".to_string(),
        }
    }
}

/// Global defaults loaded from `~/.config/foldbench/config.toml`.
///
/// Everything here can be overridden per invocation on the command line;
/// the resolved values end up in an immutable [`RunConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldbenchConfig {
    /// deltaEnergy parameter passed to RNAsubopt for the primary fold search.
    pub delta_energy: i32,
    /// Number of simultaneous worker jobs.
    pub workers: usize,
    /// CPU-time budget in hours for producer processes (0 = unlimited).
    pub timeout_hours: f64,
    /// Optional external program locations; if missing, built-in defaults are used.
    #[serde(default)]
    pub tools: Option<ToolsConfig>,
}

impl Default for FoldbenchConfig {
    fn default() -> Self {
        Self {
            delta_energy: 1,
            workers: 1,
            timeout_hours: 0.0,
            tools: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("foldbench")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FoldbenchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FoldbenchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FoldbenchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Immutable configuration for one comparison run.
///
/// Resolved once at startup from the config file and CLI flags, then shared
/// read-only (via `Arc`) by the pool, handlers, and runners.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub tools: ToolsConfig,
    /// Directory of input sequence files, one job per file.
    pub input_dir: PathBuf,
    /// Directory receiving one `<name>.json` bundle per job.
    pub output_dir: PathBuf,
    /// deltaEnergy for the primary RNAsubopt run.
    pub delta_energy: i32,
    /// Restrict this invocation to a deterministic subset of jobs.
    pub shard: Option<ShardSpec>,
    /// Ignore existing bundles and recompute everything.
    pub clean: bool,
    /// Upper bound on concurrently active jobs.
    pub workers: usize,
    /// CPU quota applied to producer processes; None = unlimited.
    pub cpu_limit: Option<Duration>,
}

impl RunConfig {
    /// Convert the config-file/CLI "hours" value into the producer CPU quota.
    pub fn cpu_limit_from_hours(hours: f64) -> Option<Duration> {
        if hours > 0.0 {
            Some(Duration::from_secs_f64(hours * 3600.0))
        } else {
            None
        }
    }
}

//! Job enumeration and sharding.
//!
//! One job per input sequence file; the job's output bundle lands at
//! `<outdir>/<stem>.json`. Names are sorted so shard membership does not
//! depend on directory listing order.

mod shard;

pub use shard::{ShardSpec, ShardSpecError};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// One unit of work; immutable after enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Job {
    fn new(file_name: &str, input_dir: &Path, output_dir: &Path) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name)
            .to_string();
        Job {
            input_path: input_dir.join(file_name),
            output_path: output_dir.join(format!("{stem}.json")),
            name: stem,
        }
    }
}

/// List the input directory and build the full job set, sorted by file name.
pub fn enumerate_jobs(input_dir: &Path, output_dir: &Path) -> Result<Vec<Job>> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("list input directory {}", input_dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("list input directory {}", input_dir.display()))?;
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => tracing::warn!(
                "skipping non-UTF-8 file name in {}",
                input_dir.display()
            ),
        }
    }
    names.sort();
    Ok(names
        .iter()
        .map(|name| Job::new(name, input_dir, output_dir))
        .collect())
}

//! Run many job handlers concurrently, draining results as they complete.
//!
//! Keeps up to `workers` jobs in flight; when one finishes, the next queued
//! job is started until the queue is empty. Completion order is
//! non-deterministic and unrelated to submission order; the reporter sees
//! jobs as they finish.

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

use crate::config::RunConfig;
use crate::handler::{self, JobOutcome};
use crate::jobs::Job;
use crate::report::Reporter;

/// Totals for the final log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub jobs_run: usize,
    pub jobs_with_errors: usize,
}

/// Execute every job with up to `cfg.workers` concurrently active.
///
/// Jobs share no in-memory state; each reads a distinct input path and
/// writes a distinct output path, so no cross-worker locking is needed.
pub async fn run_jobs<R, D>(
    cfg: Arc<RunConfig>,
    jobs: Vec<Job>,
    reporter: &mut Reporter<R, D>,
) -> Result<RunStats>
where
    R: Write,
    D: Write,
{
    let max_concurrent = cfg.workers.max(1);
    let mut queue = jobs.into_iter();
    let mut join_set = tokio::task::JoinSet::new();
    let mut stats = RunStats::default();

    loop {
        while join_set.len() < max_concurrent {
            let Some(job) = queue.next() else {
                break;
            };
            let cfg = Arc::clone(&cfg);
            // The handler blocks in wait4 on its children, so it runs on
            // the blocking pool rather than an async worker.
            join_set.spawn_blocking(move || handler::run_job(&cfg, job));
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let outcome: JobOutcome = res.map_err(|e| anyhow::anyhow!("job task join: {}", e))?;
        stats.jobs_run += 1;
        if !outcome.errors.is_empty() {
            stats.jobs_with_errors += 1;
        }
        reporter.job_finished(&outcome)?;
    }

    Ok(stats)
}

//! One unit of work per input file: consult the cache, run the missing
//! predictors, cross-check, and persist the bundle.

use crate::bundle::{self, JobBundle};
use crate::config::RunConfig;
use crate::jobs::Job;
use crate::process::{self, CommandSpec, PipedOptions};
use crate::validate;

/// Everything the pool hands to the reporter for one finished job.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: Job,
    pub bundle: JobBundle,
    pub errors: Vec<String>,
}

/// Run one job start to finish. Never fails: every problem is recorded in
/// the outcome's error list and the bundle is persisted regardless of how
/// many slots could be filled.
///
/// Blocks in wait4 on child processes; callers run this on the blocking
/// pool.
pub fn run_job(cfg: &RunConfig, job: Job) -> JobOutcome {
    let input = job.input_path.display().to_string();

    let cached = bundle::load_cached(&job.output_path, cfg.clean);
    let mut bundle = cached.bundle;
    let mut errors = cached.errors;

    if bundle.rnasubopt.is_none() {
        tracing::debug!(job = %job.name, delta = cfg.delta_energy, "running fold search");
        let run = process::run_piped(
            &input,
            &fold_search(cfg, &input, cfg.delta_energy),
            &CommandSpec::new(&cfg.tools.trivial_safety),
            PipedOptions {
                cpu_limit: cfg.cpu_limit,
                single_result: false,
            },
        );
        bundle.rnasubopt = run.result;
        errors.extend(run.errors);
    }

    if bundle.rnasubopt_single.is_none() {
        tracing::debug!(job = %job.name, "running single-optimum fold search");
        let run = process::run_piped(
            &input,
            &fold_search(cfg, &input, 0),
            &CommandSpec::new(&cfg.tools.trivial_safety)
                .arg("-num")
                .arg("1"),
            PipedOptions {
                cpu_limit: cfg.cpu_limit,
                single_result: true,
            },
        );
        bundle.rnasubopt_single = run.result;
        errors.extend(run.errors);
    }

    if bundle.safe_complete.is_none() {
        tracing::debug!(job = %job.name, "running safe-and-complete analysis");
        let spec = CommandSpec::new(&cfg.tools.safe_complete)
            .arg("-json")
            .arg("-in")
            .arg(input.as_str());
        let run = process::run_single(&input, &spec);
        bundle.safe_complete = run.result;
        errors.extend(run.errors);
    }

    if bundle.single_max_pairs.is_none() {
        tracing::debug!(job = %job.name, "running single-max-pairs analysis");
        let spec = CommandSpec::new(&cfg.tools.safe_complete)
            .arg("-json")
            .arg("-single")
            .arg("-in")
            .arg(input.as_str());
        let run = process::run_single(&input, &spec);
        bundle.single_max_pairs = run.result;
        errors.extend(run.errors);
    }

    errors.extend(validate::cross_validate(&bundle));

    if let Err(e) = bundle::save(&job.output_path, &bundle) {
        errors.push(format!(
            "Failed to write results to {}: {:#}",
            job.output_path.display(),
            e
        ));
    }

    JobOutcome {
        job,
        bundle,
        errors,
    }
}

fn fold_search(cfg: &RunConfig, input: &str, delta_energy: i32) -> CommandSpec {
    CommandSpec::new(&cfg.tools.rnasubopt)
        .arg("-e")
        .arg(delta_energy.to_string())
        .arg("-i")
        .arg(input)
}

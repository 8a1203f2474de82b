//! Piped process runner: a fold-search producer feeding a safety
//! classifier through its stdin.

use std::io::Read;
use std::process::Stdio;
use std::time::Duration;

use crate::bundle::{CommandLine, FoldData, PipedResources, PredictorResult, ResourceBlock};

use super::rusage::{self, ExitKind};
use super::{CommandSpec, RunOutput};

/// Options for one piped run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipedOptions {
    /// CPU quota applied to the producer; None = unlimited.
    pub cpu_limit: Option<Duration>,
    /// The consumer reads only a bounded prefix of the producer's output
    /// and then closes its stdin; a SIGPIPE death of the producer is
    /// expected in that mode, not an error.
    pub single_result: bool,
}

/// Run `producer | consumer`, decode the consumer's stdout, and collect
/// exit status and resource usage for both legs.
///
/// The parent's handle to the connecting pipe is given up when the
/// consumer is spawned, so end-of-stream propagates no matter how either
/// leg terminates. All failures are reported through the returned error
/// list; the result is present only if decoding succeeded and neither leg
/// was killed by an unexpected signal.
pub fn run_piped(
    input: &str,
    producer: &CommandSpec,
    consumer: &CommandSpec,
    opts: PipedOptions,
) -> RunOutput {
    let mut errors = Vec::new();
    let command = CommandLine::piped(producer.to_string(), consumer.to_string());

    let mut prod = match producer
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            errors.push(format!(
                "{}: failed to start {}: {}",
                input,
                producer.label(),
                e
            ));
            return RunOutput::failed(errors);
        }
    };

    // Hand the producer's stdout straight to the consumer. `Stdio::from`
    // owns the parent-side handle and drops it once the spawn call (or its
    // error path) is done, so the consumer sees EOF when the producer exits.
    let prod_stdout = prod.stdout.take().expect("producer stdout was piped");
    let mut cons = match consumer
        .to_command()
        .stdin(Stdio::from(prod_stdout))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            errors.push(format!(
                "{}: failed to start {}: {}",
                input,
                consumer.label(),
                e
            ));
            let _ = prod.kill();
            let _ = rusage::wait_with_usage(prod.id());
            return RunOutput::failed(errors);
        }
    };

    if let Some(limit) = opts.cpu_limit {
        if let Err(e) = rusage::set_cpu_limit(prod.id(), limit) {
            errors.push(format!(
                "{}: failed to set CPU limit for {}: {}",
                input,
                producer.label(),
                e
            ));
        }
    }

    let mut stdout_bytes = Vec::new();
    let mut prod_stderr_text = String::new();
    let mut cons_stderr_text = String::new();
    {
        let mut prod_stderr = prod.stderr.take().expect("producer stderr was piped");
        let mut cons_stderr = cons.stderr.take().expect("consumer stderr was piped");
        let mut cons_stdout = cons.stdout.take().expect("consumer stdout was piped");
        // Drain both stderr pipes on their own threads while the output is
        // read here, so a chatty child cannot deadlock the pipeline.
        std::thread::scope(|scope| {
            scope.spawn(|| {
                let _ = prod_stderr.read_to_string(&mut prod_stderr_text);
            });
            scope.spawn(|| {
                let _ = cons_stderr.read_to_string(&mut cons_stderr_text);
            });
            let _ = cons_stdout.read_to_end(&mut stdout_bytes);
        });
    }

    let prod_wait = rusage::wait_with_usage(prod.id());
    let cons_wait = rusage::wait_with_usage(cons.id());
    let (prod_wait, cons_wait) = match (prod_wait, cons_wait) {
        (Ok(p), Ok(c)) => (p, c),
        (p, c) => {
            for e in [p.err(), c.err()].into_iter().flatten() {
                errors.push(format!("{}: wait for child failed: {}", input, e));
            }
            return RunOutput::failed(errors);
        }
    };

    let fold = match serde_json::from_slice::<FoldData>(&stdout_bytes) {
        Ok(fold) => Some(fold),
        Err(e) => {
            errors.push(format!(
                "{}: failed to decode {} output: {}",
                input,
                consumer.label(),
                e
            ));
            None
        }
    };

    if !prod_stderr_text.is_empty() {
        errors.push(format!(
            "{} for {} returned errors:\n{}",
            producer.label(),
            input,
            prod_stderr_text
        ));
    }
    if !cons_stderr_text.is_empty() {
        errors.push(format!(
            "{} for {} returned errors:\n{}",
            consumer.label(),
            input,
            cons_stderr_text
        ));
    }

    if let ExitKind::Signaled(sig) = prod_wait.exit {
        let expected_pipe_close = opts.single_result && sig == libc::SIGPIPE;
        if !expected_pipe_close {
            if sig == libc::SIGXCPU {
                errors.push(format!(
                    "{}: {} exceeded the CPU time limit (terminated by signal {})",
                    input,
                    producer.label(),
                    sig
                ));
            } else {
                errors.push(format!(
                    "{}: {} was terminated by signal {}",
                    input,
                    producer.label(),
                    sig
                ));
            }
            return RunOutput::failed(errors);
        }
    }
    if let ExitKind::Signaled(sig) = cons_wait.exit {
        errors.push(format!(
            "{}: {} was terminated by signal {}",
            input,
            consumer.label(),
            sig
        ));
        return RunOutput::failed(errors);
    }

    let Some(fold) = fold else {
        return RunOutput::failed(errors);
    };

    let result = PredictorResult {
        fold,
        command,
        resources: ResourceBlock::Piped(PipedResources::new(&prod_wait.usage, &cons_wait.usage)),
    };
    RunOutput {
        result: Some(result),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::CommandLine;

    const FOLD_JSON: &str =
        r#"{"Name":"tRNA1","Bases":2,"NumFolds":4,"Free":[1,1],"Pairs":[[0,3],[3,0]]}"#;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("/bin/sh").arg("-c").arg(script)
    }

    #[test]
    fn producer_output_reaches_consumer() {
        // The consumer echoes back the base count it read from the producer.
        let producer = sh("printf '2'");
        let consumer = sh(concat!(
            "b=$(cat); ",
            r#"printf '{"Name":"tRNA1","Bases":%s,"NumFolds":4,"Free":[1,1],"Pairs":[[0,3],[3,0]]}' "$b""#,
        ));
        let run = run_piped("a.fasta", &producer, &consumer, PipedOptions::default());
        assert!(run.errors.is_empty(), "unexpected errors: {:?}", run.errors);
        let result = run.result.unwrap();
        assert_eq!(result.fold.name, "tRNA1");
        assert_eq!(result.fold.bases, 2);
        let res = result.resources.piped().unwrap();
        assert!(res.producer_user >= 0.0 && res.consumer_user >= 0.0);
        assert!(res.producer_rss_kb >= 0 && res.consumer_rss_kb >= 0);
        assert_eq!(
            result.command,
            CommandLine::piped(producer.to_string(), consumer.to_string())
        );
    }

    #[test]
    fn stderr_text_is_advisory_and_keeps_the_result() {
        let producer = sh("echo producer-warning >&2");
        let consumer = sh(&format!("cat >/dev/null; printf '%s' '{FOLD_JSON}'"));
        let run = run_piped("a.fasta", &producer, &consumer, PipedOptions::default());
        assert!(run.result.is_some());
        assert_eq!(run.errors.len(), 1);
        assert!(run.errors[0].contains("returned errors"));
        assert!(run.errors[0].contains("producer-warning"));
    }

    #[test]
    fn undecodable_output_discards_the_result() {
        let producer = sh("printf 'x'");
        let consumer = sh("cat >/dev/null; printf 'not json'");
        let run = run_piped("a.fasta", &producer, &consumer, PipedOptions::default());
        assert!(run.result.is_none());
        assert!(run.errors.iter().any(|e| e.contains("failed to decode")));
    }

    #[test]
    fn producer_killed_by_unrelated_signal_is_an_error() {
        let producer = sh("kill -USR1 $$");
        let consumer = sh(&format!("cat >/dev/null; printf '%s' '{FOLD_JSON}'"));
        let run = run_piped("a.fasta", &producer, &consumer, PipedOptions::default());
        assert!(run.result.is_none());
        let expected = format!("was terminated by signal {}", libc::SIGUSR1);
        assert!(
            run.errors.iter().any(|e| e.contains(&expected)),
            "errors: {:?}",
            run.errors
        );
    }

    #[test]
    fn sigpipe_is_expected_in_single_result_mode() {
        // The consumer reads a short prefix and closes its stdin; the
        // producer then dies of SIGPIPE mid-write.
        let producer = sh("exec cat /dev/zero");
        let consumer = sh(&format!("head -c 16 >/dev/null; printf '%s' '{FOLD_JSON}'"));

        let run = run_piped(
            "a.fasta",
            &producer,
            &consumer,
            PipedOptions {
                single_result: true,
                ..Default::default()
            },
        );
        assert!(run.result.is_some(), "errors: {:?}", run.errors);
        assert!(run.errors.is_empty());
    }

    #[test]
    fn sigpipe_without_single_result_mode_is_an_error() {
        let producer = sh("exec cat /dev/zero");
        let consumer = sh(&format!("head -c 16 >/dev/null; printf '%s' '{FOLD_JSON}'"));

        let run = run_piped("a.fasta", &producer, &consumer, PipedOptions::default());
        assert!(run.result.is_none());
        let expected = format!("was terminated by signal {}", libc::SIGPIPE);
        assert!(run.errors.iter().any(|e| e.contains(&expected)));
    }

    #[test]
    fn cpu_limit_kill_is_reported_as_timeout() {
        let producer = sh("while :; do :; done");
        let consumer = sh(&format!("cat >/dev/null; printf '%s' '{FOLD_JSON}'"));

        let run = run_piped(
            "a.fasta",
            &producer,
            &consumer,
            PipedOptions {
                cpu_limit: Some(Duration::from_secs(1)),
                single_result: false,
            },
        );
        assert!(run.result.is_none());
        assert!(
            run.errors.iter().any(|e| e.contains("CPU time limit")),
            "errors: {:?}",
            run.errors
        );
    }
}

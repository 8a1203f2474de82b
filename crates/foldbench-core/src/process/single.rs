//! Standalone process runner for the single-program analyzers.

use std::io::Read;
use std::process::Stdio;

use crate::bundle::{CommandLine, FoldData, PredictorResult, ResourceBlock, SingleResources};

use super::rusage::{self, ExitKind};
use super::{CommandSpec, RunOutput};

/// Run one program, decode its stdout, and collect exit status and
/// resource usage. Unlike the piped runner there is no special-casing of
/// termination signals: any signal discards the result.
pub fn run_single(input: &str, spec: &CommandSpec) -> RunOutput {
    let mut errors = Vec::new();
    let command = CommandLine::single(spec.to_string());

    let mut child = match spec
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            errors.push(format!("{}: failed to start {}: {}", input, spec.label(), e));
            return RunOutput::failed(errors);
        }
    };

    let mut stdout_bytes = Vec::new();
    let mut stderr_text = String::new();
    {
        let mut stderr = child.stderr.take().expect("stderr was piped");
        let mut stdout = child.stdout.take().expect("stdout was piped");
        std::thread::scope(|scope| {
            scope.spawn(|| {
                let _ = stderr.read_to_string(&mut stderr_text);
            });
            let _ = stdout.read_to_end(&mut stdout_bytes);
        });
    }

    let wait = match rusage::wait_with_usage(child.id()) {
        Ok(wait) => wait,
        Err(e) => {
            errors.push(format!("{}: wait for child failed: {}", input, e));
            return RunOutput::failed(errors);
        }
    };

    let fold = match serde_json::from_slice::<FoldData>(&stdout_bytes) {
        Ok(fold) => Some(fold),
        Err(e) => {
            errors.push(format!(
                "{}: failed to decode {} output: {}",
                input,
                spec.label(),
                e
            ));
            None
        }
    };

    if !stderr_text.is_empty() {
        errors.push(format!(
            "{} for {} returned errors:\n{}",
            spec.label(),
            input,
            stderr_text
        ));
    }

    if let ExitKind::Signaled(sig) = wait.exit {
        errors.push(format!(
            "{}: {} was terminated by signal {}",
            input,
            spec.label(),
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
        resources: ResourceBlock::Single(SingleResources::new(&wait.usage)),
    };
    RunOutput {
        result: Some(result),
        errors,
    }
}

//! External process runners for the predictor programs.
//!
//! Two flavors: a piped runner wiring a fold-search producer into a safety
//! classifier, and a standalone runner for the single-program analyzers.
//! Both block until their children exit and reap them with wait4(2) so
//! resource usage and termination signals are available; the job handler
//! calls them from the blocking pool.

mod pipeline;
mod rusage;
mod single;

pub use pipeline::{run_piped, PipedOptions};
pub use rusage::{set_cpu_limit, wait_with_usage, ExitKind, WaitOutcome};
pub use single::run_single;

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::bundle::PredictorResult;

/// A program plus its arguments, resolved before spawning.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Short program name used in diagnostics (path stripped).
    pub fn label(&self) -> &str {
        Path::new(&self.program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.program)
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What one runner invocation produced: a decoded result if the run was
/// usable, plus any advisory errors collected along the way.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub result: Option<PredictorResult>,
    pub errors: Vec<String>,
}

impl RunOutput {
    fn failed(errors: Vec<String>) -> Self {
        Self {
            result: None,
            errors,
        }
    }
}

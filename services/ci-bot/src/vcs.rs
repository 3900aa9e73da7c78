//! Version Control Runner
//!
//! Narrow seam around the `git` command-line tool. The publisher only ever
//! sees argument lists going in and `(stdout, exit code)` coming out, which
//! keeps it testable without a real repository.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::BotError;

/// Captured result of one version-control command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcsOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl VcsOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs version-control commands
pub trait VcsRunner {
    /// Run one command. A non-zero exit is reported in the output, not as an
    /// error; `Err` means the tool could not be started at all.
    fn run(&self, args: &[&str]) -> Result<VcsOutput, BotError>;
}

/// [`VcsRunner`] backed by the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    working_dir: PathBuf,
}

impl GitCli {
    /// Run `git` inside `working_dir`
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: "git".to_string(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Use a different git executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl VcsRunner for GitCli {
    fn run(&self, args: &[&str]) -> Result<VcsOutput, BotError> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| {
                BotError::Configuration(format!(
                    "Failed to execute {} in {:?}: {}",
                    self.program, self.working_dir, e
                ))
            })?;

        let result = VcsOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code(),
        };

        debug!(exit_code = ?result.exit_code, "git command finished");
        Ok(result)
    }
}

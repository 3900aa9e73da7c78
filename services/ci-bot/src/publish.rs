//! Change Publisher
//!
//! Commits and pushes pending working-tree changes (usually bumped submodule
//! pointers) with a bot identity. A clean tree is a successful no-op so the
//! pipeline step never fails just because there was nothing to do.
//!
//! Steps, in order:
//! 1. configure the committer identity
//! 2. `git diff --quiet` to classify the tree
//! 3. `git add .`
//! 4. `git commit -m <message>`
//! 5. `git push <token url> HEAD`

use std::fmt;

use tracing::{info, warn};

use crate::config::PublishConfig;
use crate::error::BotError;
use crate::vcs::{VcsOutput, VcsRunner};

/// Message reported when there is nothing to publish
pub const NO_CHANGES_MESSAGE: &str = "No submodule changes.";

const DIFF_ARGS: [&str; 2] = ["diff", "--quiet"];

/// Working tree state as reported by `git diff --quiet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeStatus {
    /// Exit 0: no differences
    Clean,
    /// Exit 1: differences present
    Dirty,
    /// Any other exit (or a signal): git itself failed
    CheckFailed { code: Option<i32>, stderr: String },
}

impl TreeStatus {
    pub fn from_output(output: &VcsOutput) -> Self {
        match output.exit_code {
            Some(0) => TreeStatus::Clean,
            Some(1) => TreeStatus::Dirty,
            code => TreeStatus::CheckFailed {
                code,
                stderr: output.stderr.clone(),
            },
        }
    }
}

/// Terminal state of a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Tree was clean, nothing staged, committed or pushed
    NoOp,
    /// One commit created and pushed
    Published,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::NoOp => write!(f, "no-op"),
            PublishOutcome::Published => write!(f, "published"),
        }
    }
}

/// Publishes local changes to the configured remote
pub struct ChangePublisher<R: VcsRunner> {
    runner: R,
    config: PublishConfig,
}

impl<R: VcsRunner> ChangePublisher<R> {
    pub fn new(runner: R, config: PublishConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the full configure / detect / stage / commit / push sequence.
    pub fn publish(&self) -> Result<PublishOutcome, BotError> {
        self.configure_identity()?;

        match self.detect_changes()? {
            TreeStatus::Clean => {
                info!("{}", NO_CHANGES_MESSAGE);
                return Ok(PublishOutcome::NoOp);
            }
            TreeStatus::Dirty => info!("📝 Working tree has changes, publishing..."),
            TreeStatus::CheckFailed { code, stderr } => {
                warn!(exit_code = ?code, "git diff --quiet failed");
                return Err(BotError::VersionControl {
                    command: DIFF_ARGS.join(" "),
                    code,
                    stderr,
                });
            }
        }

        self.stage()?;
        self.commit()?;
        self.push()?;

        info!(
            "✅ Pushed \"{}\" to {}",
            self.config.commit_message, self.config.repository
        );
        Ok(PublishOutcome::Published)
    }

    /// Set the bot committer identity on the local repository.
    pub fn configure_identity(&self) -> Result<(), BotError> {
        let identity = &self.config.identity;
        info!("🤖 Configuring committer {} <{}>", identity.name, identity.email);

        for (key, value) in [
            ("user.name", identity.name.as_str()),
            ("user.email", identity.email.as_str()),
        ] {
            let output = self.runner.run(&["config", key, value])?;
            if !output.success() {
                return Err(BotError::Configuration(format!(
                    "Failed to set {} (is this a git repository?): {}",
                    key, output.stderr
                )));
            }
        }

        Ok(())
    }

    /// Classify the working tree: clean, dirty, or the check itself failed.
    pub fn detect_changes(&self) -> Result<TreeStatus, BotError> {
        let output = self.runner.run(&DIFF_ARGS)?;
        Ok(TreeStatus::from_output(&output))
    }

    /// Stage everything in the working tree.
    pub fn stage(&self) -> Result<(), BotError> {
        self.run_checked(&["add", "."])?;
        Ok(())
    }

    /// Commit staged changes with the configured message.
    pub fn commit(&self) -> Result<(), BotError> {
        info!("📦 Committing: {}", self.config.commit_message);
        self.run_checked(&["commit", "-m", &self.config.commit_message])?;
        Ok(())
    }

    /// Push HEAD to the token-authenticated remote.
    pub fn push(&self) -> Result<(), BotError> {
        info!(
            "🚀 Pushing HEAD to {}/{}",
            self.config.host, self.config.repository
        );
        let url = self.config.push_url();
        self.run_checked(&["push", &url, "HEAD"])?;
        Ok(())
    }

    fn run_checked(&self, args: &[&str]) -> Result<VcsOutput, BotError> {
        let output = self.runner.run(args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(self.command_error(args, output))
        }
    }

    fn command_error(&self, args: &[&str], output: VcsOutput) -> BotError {
        // git sometimes echoes the remote URL back on stderr
        BotError::VersionControl {
            command: self.config.redact(&args.join(" ")),
            code: output.exit_code,
            stderr: self.config.redact(&output.stderr),
        }
    }
}

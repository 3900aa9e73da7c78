//! CI Bot Tools Library
//!
//! Rust utilities for authenticating as a GitHub App and publishing
//! automated submodule updates from CI.
//!
//! ## Binaries
//!
//! - `issue-token`: Mint a GitHub App installation access token
//! - `publish-changes`: Commit and push pending changes using that token
//!
//! ## Example Pipeline
//!
//! ```bash
//! # Prints "::add-mask::<token>" then "BOT_TOKEN=<token>"
//! issue-token
//!
//! # With BOT_TOKEN captured into the environment by the pipeline
//! publish-changes --repo "$GITHUB_REPOSITORY"
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod publish;
pub mod token;
pub mod vcs;

pub use config::{AppCredentials, CommitIdentity, PublishConfig, RepoSlug};
pub use error::BotError;
pub use publish::{ChangePublisher, PublishOutcome, TreeStatus};
pub use token::{InstallationToken, TokenIssuer};
pub use vcs::{GitCli, VcsOutput, VcsRunner};

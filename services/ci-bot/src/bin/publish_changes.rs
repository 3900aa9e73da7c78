//! Submodule Change Publisher
//!
//! Commits and pushes pending working-tree changes with the bot identity,
//! authenticating the push with an installation token. Exits 0 without doing
//! anything when the tree is clean.
//!
//! ## Usage
//! ```bash
//! GITHUB_REPOSITORY=octo/kernel \
//! BOT_TOKEN=<INSTALLATION_TOKEN> \
//! publish-changes
//!
//! # Explicit arguments
//! publish-changes \
//!   --repo octo/kernel \
//!   --token <INSTALLATION_TOKEN> \
//!   --repo-dir ./checkout
//! ```

use anyhow::Result;
use ci_bot::config::{
    DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_COMMIT_MESSAGE, DEFAULT_GIT_HOST,
};
use ci_bot::publish::NO_CHANGES_MESSAGE;
use ci_bot::{
    logging, BotError, ChangePublisher, CommitIdentity, GitCli, PublishConfig, PublishOutcome,
    RepoSlug,
};
use clap::Parser;
use tracing::error;

/// Submodule Change Publisher
#[derive(Parser, Debug)]
#[command(name = "publish-changes")]
#[command(about = "Commit and push pending changes using a bot token")]
#[command(version)]
struct Args {
    /// Repository in format owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: String,

    /// Installation token from issue-token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    token: String,

    /// Git host the repository lives on
    #[arg(long, default_value = DEFAULT_GIT_HOST)]
    host: String,

    /// Path to the checked-out repository
    #[arg(long, default_value = ".")]
    repo_dir: String,

    /// Committer name
    #[arg(long, default_value = DEFAULT_AUTHOR_NAME)]
    author_name: String,

    /// Committer email
    #[arg(long, default_value = DEFAULT_AUTHOR_EMAIL)]
    author_email: String,

    /// Commit message
    #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
    message: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<PublishOutcome, BotError> {
    let repository: RepoSlug = args.repo.parse()?;
    let config = PublishConfig::new(repository, args.token)?
        .host(args.host)
        .identity(CommitIdentity {
            name: args.author_name,
            email: args.author_email,
        })
        .commit_message(args.message);

    let publisher = ChangePublisher::new(GitCli::new(&args.repo_dir), config);
    publisher.publish()
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    match run(args) {
        Ok(PublishOutcome::NoOp) => {
            println!("{}", NO_CHANGES_MESSAGE);
            Ok(())
        }
        Ok(PublishOutcome::Published) => Ok(()),
        Err(err) => {
            error!("❌ {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

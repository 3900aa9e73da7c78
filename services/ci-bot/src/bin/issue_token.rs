//! GitHub App Installation Token Issuer
//!
//! Mints a short-lived installation access token from GitHub App credentials.
//! Signs an RS256 JWT to authenticate as the App, exchanges it for an
//! installation token, then prints two lines for the CI runner:
//!
//! ```text
//! ::add-mask::<token>
//! BOT_TOKEN=<token>
//! ```
//!
//! ## Usage
//! ```bash
//! # With environment variables (the usual CI setup)
//! APP_ID=123456 \
//! INSTALLATION_ID=78901234 \
//! APP_PRIVATE_KEY="$(cat key.pem)" \
//! issue-token
//!
//! # With a key file
//! issue-token \
//!   --app-id 123456 \
//!   --installation-id 78901234 \
//!   --private-key-path ./key.pem
//! ```

use anyhow::{Context, Result};
use ci_bot::config::DEFAULT_API_URL;
use ci_bot::token::{emit_pipeline_lines, DEFAULT_OUTPUT_VAR};
use ci_bot::{logging, AppCredentials, TokenIssuer};
use clap::Parser;
use std::fs;

/// GitHub App Installation Token Issuer
#[derive(Parser, Debug)]
#[command(name = "issue-token")]
#[command(about = "Mint a GitHub App installation access token for CI")]
#[command(version)]
struct Args {
    /// GitHub App ID
    #[arg(long, env = "APP_ID")]
    app_id: String,

    /// GitHub App Installation ID
    #[arg(long, env = "INSTALLATION_ID")]
    installation_id: String,

    /// Private key PEM contents (literal "\n" sequences are accepted)
    #[arg(
        long,
        env = "APP_PRIVATE_KEY",
        hide_env_values = true,
        conflicts_with = "private_key_path"
    )]
    private_key: Option<String>,

    /// Path to the private key PEM file
    #[arg(long, env = "APP_PRIVATE_KEY_PATH")]
    private_key_path: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Variable name used in the KEY=value output line
    #[arg(long, default_value = DEFAULT_OUTPUT_VAR)]
    output_var: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_private_key(args: &Args) -> Result<String> {
    match (&args.private_key, &args.private_key_path) {
        (Some(pem), _) => Ok(pem.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read private key: {}", path)),
        (None, None) => {
            anyhow::bail!("Either --private-key (APP_PRIVATE_KEY) or --private-key-path must be set")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let private_key = load_private_key(&args)?;
    let credentials = AppCredentials::new(&args.app_id, &args.installation_id, private_key)?;

    let issuer = TokenIssuer::new(&args.api_url);
    let token = issuer.issue(&credentials).await?;

    let stdout = std::io::stdout();
    emit_pipeline_lines(&mut stdout.lock(), &args.output_var, &token.token)
        .context("Failed to write token to stdout")?;

    Ok(())
}

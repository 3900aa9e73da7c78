//! Installation Token Issuer
//!
//! Exchanges a signed GitHub App JWT for a short-lived installation access
//! token and hands it to the surrounding pipeline on stdout.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::generate_jwt;
use crate::config::{AppCredentials, DEFAULT_API_URL};
use crate::error::BotError;

/// Environment variable name the token is exported under by default
pub const DEFAULT_OUTPUT_VAR: &str = "BOT_TOKEN";

const USER_AGENT: &str = "lornu-ai-ci-bot";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Response from GitHub installation token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Signs assertions and exchanges them for installation tokens
pub struct TokenIssuer {
    client: reqwest::Client,
    api_url: String,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl TokenIssuer {
    /// Create an issuer talking to the given API base URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Installation access token endpoint for `installation_id`
    pub fn access_tokens_url(&self, installation_id: &str) -> String {
        format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, installation_id
        )
    }

    /// Exchange a JWT for an installation access token
    pub async fn exchange(
        &self,
        jwt: &str,
        installation_id: &str,
    ) -> Result<InstallationToken, BotError> {
        let url = self.access_tokens_url(installation_id);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", jwt))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| {
                BotError::Transport(format!("Failed to send request to GitHub API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Transport(format!(
                "GitHub API error ({}): {}",
                status, body
            )));
        }

        response.json::<InstallationToken>().await.map_err(|e| {
            BotError::Transport(format!(
                "Failed to parse installation token response: {}",
                e
            ))
        })
    }

    /// Sign a fresh JWT and exchange it. Nothing is cached between calls.
    pub async fn issue(&self, credentials: &AppCredentials) -> Result<InstallationToken, BotError> {
        info!("🔐 Generating JWT for GitHub App {}...", credentials.app_id);
        let jwt = generate_jwt(credentials)?;

        info!(
            "🔑 Exchanging JWT for installation token (installation: {})...",
            credentials.installation_id
        );
        let token = self.exchange(&jwt, &credentials.installation_id).await?;

        match token.expires_at {
            Some(expires_at) => info!("✅ Token generated successfully (expires: {})", expires_at),
            None => info!("✅ Token generated successfully"),
        }

        Ok(token)
    }
}

/// Write the log-mask directive followed by the `KEY=value` assignment.
pub fn emit_pipeline_lines<W: Write>(
    out: &mut W,
    output_var: &str,
    token: &str,
) -> std::io::Result<()> {
    writeln!(out, "::add-mask::{}", token)?;
    writeln!(out, "{}={}", output_var, token)?;
    out.flush()
}

//! Run Configuration
//!
//! Immutable configuration handed to the token issuer and the change
//! publisher. The binaries build these from their CLI arguments (which clap
//! also reads from the environment); library code never touches the
//! environment itself.

use std::fmt;
use std::str::FromStr;

use crate::error::BotError;

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default git host used for pushes
pub const DEFAULT_GIT_HOST: &str = "github.com";

/// Default commit message for automated submodule bumps
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: auto update submodules";

/// Default bot committer name
pub const DEFAULT_AUTHOR_NAME: &str = "queen-of-love-and-hate[bot]";

/// Default bot committer email
pub const DEFAULT_AUTHOR_EMAIL: &str = "queen-of-love-and-hate@users.noreply.github.com";

/// Credentials identifying one installation of a GitHub App
#[derive(Clone)]
pub struct AppCredentials {
    /// GitHub App ID
    pub app_id: String,
    /// Installation ID the token is scoped to
    pub installation_id: String,
    /// RSA private key in PEM format, newlines normalized
    pub private_key: String,
}

impl AppCredentials {
    /// Build credentials, rejecting empty fields.
    ///
    /// Escaped `\n` sequences in the key (as stored in most CI secret
    /// stores) are turned back into real newlines.
    pub fn new(
        app_id: impl Into<String>,
        installation_id: impl Into<String>,
        private_key: impl AsRef<str>,
    ) -> Result<Self, BotError> {
        let app_id = app_id.into().trim().to_string();
        let installation_id = installation_id.into().trim().to_string();
        let private_key = normalize_private_key(private_key.as_ref());

        if app_id.is_empty() {
            return Err(BotError::Configuration("App ID is empty".to_string()));
        }
        if installation_id.is_empty() {
            return Err(BotError::Configuration(
                "Installation ID is empty".to_string(),
            ));
        }
        if private_key.trim().is_empty() {
            return Err(BotError::Configuration("Private key is empty".to_string()));
        }

        Ok(Self {
            app_id,
            installation_id,
            private_key,
        })
    }
}

// The key never appears in debug output.
impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Replace literal `\n` escape sequences with real newlines
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Repository slug in `owner/repo` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.trim_end_matches(".git").to_string(),
            }),
            _ => Err(BotError::Configuration(format!(
                "Invalid repository format: {}. Expected: owner/repo",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Committer identity configured on the local repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR_NAME.to_string(),
            email: DEFAULT_AUTHOR_EMAIL.to_string(),
        }
    }
}

/// Everything the change publisher needs for one run
#[derive(Clone)]
pub struct PublishConfig {
    /// Target repository
    pub repository: RepoSlug,
    /// Installation token used to authenticate the push
    pub token: String,
    /// Git host, e.g. `github.com`
    pub host: String,
    /// Bot identity for the commit
    pub identity: CommitIdentity,
    /// Commit message
    pub commit_message: String,
}

impl PublishConfig {
    /// Create a config with the default host, identity and commit message.
    pub fn new(repository: RepoSlug, token: impl Into<String>) -> Result<Self, BotError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(BotError::Configuration("Bot token is empty".to_string()));
        }

        Ok(Self {
            repository,
            token,
            host: DEFAULT_GIT_HOST.to_string(),
            identity: CommitIdentity::default(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        })
    }

    /// Override the git host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the committer identity
    pub fn identity(mut self, identity: CommitIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Override the commit message
    pub fn commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Authenticated HTTPS remote URL carrying the token
    pub fn push_url(&self) -> String {
        format!(
            "https://x-access-token:{}@{}/{}.git",
            self.token, self.host, self.repository
        )
    }

    /// Replace the token wherever it appears in `text`
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.token, "***")
    }
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("identity", &self.identity)
            .field("commit_message", &self.commit_message)
            .finish()
    }
}

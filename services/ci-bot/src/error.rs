//! Error types shared by the token issuer and the change publisher.

use thiserror::Error;

/// Errors that can occur while issuing a token or publishing changes
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or invalid credentials, or no usable repository context
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The token exchange with the GitHub API failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// A git command exited unsuccessfully
    #[error("git {command} failed ({}): {stderr}", describe_code(.code))]
    VersionControl {
        /// Command arguments, with credentials redacted
        command: String,
        /// Exit code, `None` when git was killed by a signal
        code: Option<i32>,
        /// Diagnostic text git wrote to stderr
        stderr: String,
    },
}

impl BotError {
    /// Process exit status a binary should terminate with for this error.
    ///
    /// Git failures propagate git's own exit code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BotError::VersionControl {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl From<jsonwebtoken::errors::Error> for BotError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BotError::Configuration(format!("Failed to sign JWT: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_exit_code_propagates() {
        let err = BotError::VersionControl {
            command: "push".to_string(),
            code: Some(128),
            stderr: "fatal: Authentication failed".to_string(),
        };
        assert_eq!(err.exit_code(), 128);
        assert_eq!(
            err.to_string(),
            "git push failed (exit code 128): fatal: Authentication failed"
        );
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        assert_eq!(BotError::Transport("401".into()).exit_code(), 1);
        assert_eq!(BotError::Configuration("missing".into()).exit_code(), 1);

        let signalled = BotError::VersionControl {
            command: "commit".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(signalled.exit_code(), 1);
        assert!(signalled.to_string().contains("terminated by signal"));
    }
}

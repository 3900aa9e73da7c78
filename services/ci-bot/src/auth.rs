//! GitHub App Authentication
//!
//! Builds the RS256-signed JWT a GitHub App presents when asking for an
//! installation token.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::AppCredentials;
use crate::error::BotError;

/// Lifetime of the signed assertion in seconds (GitHub's maximum)
pub const JWT_LIFETIME_SECS: i64 = 600;

/// JWT claims for GitHub App authentication
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubAppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

impl GitHubAppClaims {
    pub fn new(app_id: &str, issued_at: i64) -> Self {
        Self {
            iat: issued_at,
            exp: issued_at + JWT_LIFETIME_SECS,
            iss: app_id.to_string(),
        }
    }
}

/// Sign an assertion as of `issued_at` (Unix seconds)
pub fn sign_assertion(credentials: &AppCredentials, issued_at: i64) -> Result<String, BotError> {
    let claims = GitHubAppClaims::new(&credentials.app_id, issued_at);

    let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .map_err(|e| BotError::Configuration(format!("Failed to parse private key: {}", e)))?;

    let header = Header::new(Algorithm::RS256);

    Ok(encode(&header, &claims, &encoding_key)?)
}

/// Generate a JWT for GitHub App authentication
///
/// # Returns
/// A JWT string valid for 10 minutes from now
pub fn generate_jwt(credentials: &AppCredentials) -> Result<String, BotError> {
    sign_assertion(credentials, Utc::now().timestamp())
}

//! Authentication for the GitHub API
//!
//! The token is optional: requests go out unauthenticated when it is
//! missing, which works for public repositories until the rate limit hits.

use tracing::debug;

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "TOKEN";

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// No token available
    Anonymous,
}

/// Resolved GitHub authentication
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Bearer token, if any
    pub token: Option<String>,
    /// Where the token came from
    pub source: AuthSource,
}

impl GitHubAuthConfig {
    /// Build from a raw token value; blank values count as missing
    pub fn from_token(token: Option<String>) -> Self {
        match token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(token) => Self {
                token: Some(token),
                source: AuthSource::EnvVar,
            },
            None => Self {
                token: None,
                source: AuthSource::Anonymous,
            },
        }
    }

    /// Whether requests will be authenticated
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Read GitHub authentication from `TOKEN`
pub fn get_github_auth() -> GitHubAuthConfig {
    let auth = GitHubAuthConfig::from_token(std::env::var(TOKEN_ENV_VAR).ok());
    debug!(source = ?auth.source, "resolved GitHub auth");
    auth
}

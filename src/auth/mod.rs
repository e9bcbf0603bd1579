//! GitHub token resolution
//!
//! Supports an explicit token (flag or workflow environment variable),
//! the conventional token environment variables, and the `gh` CLI.

use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables consulted when no explicit token is given
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line or in the workflow's own variable
    Explicit,
    /// Token from a conventional environment variable
    EnvVar,
    /// Token from the `gh` CLI
    Cli,
}

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Access token, trimmed
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Trim a token candidate, discarding empty values
fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolve a GitHub token.
///
/// Workflow secrets are often stored with a trailing newline, so every
/// candidate is trimmed and empty values are skipped.
pub async fn get_github_auth(explicit: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = explicit.and_then(normalize_token) {
        debug!("using explicit GitHub token");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Explicit,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Some(token) = std::env::var(var).ok().as_deref().and_then(normalize_token) {
            debug!(var, "using GitHub token from environment");
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
            });
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token given and gh CLI unavailable: {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token given and `gh auth token` failed; set GITHUB_TOKEN".to_string(),
        ));
    }

    let token = normalize_token(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| Error::Auth("`gh auth token` returned an empty token".to_string()))?;

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}

//! Error types for bhc-workflow

use thiserror::Error;

/// Errors that can occur in bhc-workflow
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub REST API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GraphQL query returned errors or an unexpected shape
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A git command failed
    #[error("git command failed: {command}\nstderr: {stderr}")]
    Git {
        /// The git invocation
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// A manifest file could not be parsed or rewritten
    #[error("manifest error in {path}: {message}")]
    Manifest {
        /// File being processed
        path: String,
        /// What went wrong
        message: String,
    },

    /// Invalid settings or run configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable token
    #[error("authentication error: {0}")]
    Auth(String),

    /// A repository name that is not `owner/name`
    #[error("invalid repository name '{0}', expected owner/name")]
    InvalidRepoName(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result type alias for bhc-workflow
pub type Result<T> = std::result::Result<T, Error>;

//! Tunable settings shared by both workflows.
//!
//! Every field has a default matching the production workflow, so the
//! settings file is optional and may set any subset of keys.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Identity used for manifest commits, passed to git via `-c` flags
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitIdentity {
    /// git `user.name`
    pub name: String,
    /// git `user.email`
    pub email: String,
}

/// Workflow settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Integration branch feature branches start from and PRs target
    pub base_branch: String,
    /// Label attached to generated manifest PRs
    pub automation_label: String,
    /// Color used when the automation label has to be created
    pub automation_label_color: String,
    /// Label a linked PR must carry before the gate merges it
    pub required_label: String,
    /// Extension of manifest files, without the dot
    pub manifest_extension: String,
    /// Mergeability queries per PR before giving up
    pub poll_attempts: u32,
    /// Seconds between mergeability queries
    pub poll_delay_secs: u64,
    /// Seconds to wait after pushing a new branch
    pub branch_settle_secs: u64,
    /// GraphQL endpoint
    pub graphql_url: String,
    /// REST API root
    pub api_url: String,
    /// Commit identity; git's own configuration is used when absent
    pub commit_identity: Option<CommitIdentity>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_branch: "develop".to_string(),
            automation_label: "bhc-auto-merge".to_string(),
            automation_label_color: "008672".to_string(),
            required_label: "CCI-Verified".to_string(),
            manifest_extension: "xml".to_string(),
            poll_attempts: 10,
            poll_delay_secs: 2,
            branch_settle_secs: 5,
            graphql_url: "https://api.github.com/graphql".to_string(),
            api_url: "https://api.github.com".to_string(),
            commit_identity: None,
        }
    }
}

impl Settings {
    /// Delay between mergeability queries
    pub const fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }

    /// Delay after pushing a freshly created branch
    pub const fn branch_settle(&self) -> Duration {
        Duration::from_secs(self.branch_settle_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_attempts == 0 {
            return Err(Error::Config("poll_attempts must be at least 1".to_string()));
        }
        if self.base_branch.trim().is_empty() {
            return Err(Error::Config("base_branch must not be empty".to_string()));
        }
        if self.manifest_extension.starts_with('.') {
            return Err(Error::Config(format!(
                "manifest_extension '{}' must not start with a dot",
                self.manifest_extension
            )));
        }
        Ok(())
    }
}

/// Load settings from an optional TOML file.
///
/// Returns defaults when `path` is `None`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let settings: Settings = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    settings.validate()?;
    Ok(settings)
}

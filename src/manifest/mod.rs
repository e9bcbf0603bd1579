//! Manifest revision updates
//!
//! Manifest files list `<project name="..." revision="..."/>` elements.
//! Propagating merge commits means pointing each affected project's
//! `revision` at the new SHA while leaving everything else untouched.

mod update;

pub use update::{ProjectUpdate, rewrite_manifest, update_manifest_dir, update_manifest_file};

use crate::types::{MergeCommit, short_repo_name};
use std::collections::BTreeMap;

/// Project name -> target revision
///
/// Keys are the last path segment of the repository full name. When two
/// commits map to the same project the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestUpdateSet {
    revisions: BTreeMap<String, String>,
}

impl ManifestUpdateSet {
    /// Build the update set from resolved merge commits
    pub fn from_commits(commits: &[MergeCommit]) -> Self {
        let mut set = Self::default();
        for commit in commits {
            set.insert(short_repo_name(&commit.repo), &commit.sha);
        }
        set
    }

    /// Set the target revision for a project
    pub fn insert(&mut self, project: &str, revision: &str) {
        self.revisions
            .insert(project.to_string(), revision.to_string());
    }

    /// Target revision for a project, if it is being updated
    pub fn get(&self, project: &str) -> Option<&str> {
        self.revisions.get(project).map(String::as_str)
    }

    /// Project names in key order
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.revisions.keys().map(String::as_str)
    }

    /// Number of projects being updated
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// No projects to update
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}

impl std::fmt::Display for ManifestUpdateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs: Vec<String> = self
            .revisions
            .iter()
            .map(|(project, sha)| format!("{project}={sha}"))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

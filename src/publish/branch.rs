//! Feature branch lifecycle in the manifest checkout

use crate::error::Result;
use crate::manifest::{ManifestUpdateSet, update_manifest_dir};
use crate::repo::{REMOTE, Workspace, remote_has_branch};
use std::path::PathBuf;
use tracing::info;

/// Result of preparing the feature branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// The branch was created from the base branch and pushed
    Created,
    /// The branch already exists on the remote; a previous run owns it
    AlreadyExists,
}

/// Create `branch` from `base` and push it, unless it already exists remotely.
///
/// The new branch is pushed before any commit so the existence check of
/// later runs sees it. The check and the push are not atomic: two runs
/// racing on the same branch can both get past the check.
pub fn prepare_branch(workspace: &dyn Workspace, branch: &str, base: &str) -> Result<BranchOutcome> {
    workspace.fetch(REMOTE)?;

    let remote_branches = workspace.remote_branches()?;
    if remote_has_branch(&remote_branches, REMOTE, branch) {
        info!("Branch {branch} already exists remotely. Stopping further processing.");
        return Ok(BranchOutcome::AlreadyExists);
    }

    workspace.checkout(base)?;
    workspace.pull(REMOTE, base)?;

    workspace.create_branch(branch)?;
    info!("Created and checked out new branch: {branch}");

    workspace.push(REMOTE, branch)?;
    Ok(BranchOutcome::Created)
}

/// Rewrite manifests in the working copy and stage the result.
///
/// Returns the rewritten files; nothing is staged when the list is empty.
pub fn apply_manifest_updates(
    workspace: &dyn Workspace,
    updates: &ManifestUpdateSet,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let changed = update_manifest_dir(workspace.root(), updates, extension)?;
    if changed.is_empty() {
        info!("No changes were made to manifest files.");
    } else {
        workspace.stage_all()?;
    }
    Ok(changed)
}

/// Commit staged changes and push the current branch.
///
/// Does nothing on a clean working copy, so no empty commits are created.
/// Returns whether a commit was made.
pub fn commit_and_push(workspace: &dyn Workspace, message: &str) -> Result<bool> {
    if !workspace.is_dirty()? {
        info!("No changes to commit.");
        return Ok(false);
    }

    workspace.commit(message)?;
    let branch = workspace.current_branch()?;
    workspace.push(REMOTE, &branch)?;
    Ok(true)
}

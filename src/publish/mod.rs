//! Manifest propagation: resolve linked merge commits, rewrite the
//! manifests on a feature branch and open a PR for them.
//!
//! Phases, each a separate module:
//! 1. Naming - branch, title and body (pure)
//! 2. Branch - create the feature branch, commit and push (git)
//! 3. PR - open and label the manifest PR (API, failures are soft)

mod branch;
mod naming;
mod pr;

pub use branch::{BranchOutcome, apply_manifest_updates, commit_and_push, prepare_branch};
pub use naming::{
    NO_TICKET, PublishTarget, build_pr_description, build_pr_list_description, commit_message,
    extract_ticket_number,
};
pub use pr::{ManifestPr, open_manifest_pr};

use crate::config::Settings;
use crate::error::Result;
use crate::manifest::ManifestUpdateSet;
use crate::platform::PlatformService;
use crate::repo::Workspace;
use crate::types::{PullRequest, RepoName};
use std::path::PathBuf;
use tracing::info;

/// What triggered the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOrigin {
    /// A merged PR in the originating repository
    PullRequest(u64),
    /// A tracking issue in the originating repository
    Issue(u64),
}

impl SyncOrigin {
    const fn number(self) -> u64 {
        match self {
            Self::PullRequest(n) | Self::Issue(n) => n,
        }
    }
}

/// Inputs of one manifest propagation run
#[derive(Debug, Clone)]
pub struct ManifestSyncConfig {
    /// Manifest repository the PR is opened against
    pub manifest_repo: RepoName,
    /// Repository that triggered the run
    pub origin_repo: RepoName,
    /// Organization the linked-PR query runs under
    pub owner: String,
    /// Triggering PR or issue
    pub origin: SyncOrigin,
}

impl ManifestSyncConfig {
    /// Repository the linked-PR query starts from
    pub fn query_repo(&self) -> RepoName {
        RepoName::new(self.owner.clone(), self.origin_repo.name.clone())
    }
}

/// How a manifest propagation run ended
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// No merge commits were found; nothing was touched
    NothingToDo,
    /// The feature branch already exists remotely; nothing was touched
    BranchExists {
        /// Feature branch name
        branch: String,
    },
    /// The branch was created but no manifest needed changing
    NoChanges {
        /// Feature branch name
        branch: String,
    },
    /// Manifests were committed and pushed
    Published {
        /// Feature branch name
        branch: String,
        /// Rewritten manifest files
        changed_files: Vec<PathBuf>,
        /// The opened PR, if creation succeeded
        pr: Option<PullRequest>,
    },
}

impl SyncOutcome {
    /// Whether the run should exit successfully.
    ///
    /// An existing remote branch means another run owns the update, which
    /// ends the workflow with a failure status.
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::BranchExists { .. })
    }
}

/// Run manifest propagation end to end.
pub async fn run_manifest_sync(
    config: &ManifestSyncConfig,
    settings: &Settings,
    platform: &dyn PlatformService,
    workspace: &dyn Workspace,
) -> Result<SyncOutcome> {
    let origin_number = config.origin.number();
    let query_repo = config.query_repo();

    let (details, linked) = match config.origin {
        SyncOrigin::PullRequest(n) => (
            platform.get_pr_details(&config.origin_repo, n).await?,
            platform.resolve_linked_merge_commits(&query_repo, n).await?,
        ),
        SyncOrigin::Issue(n) => (
            platform.get_issue_details(&config.origin_repo, n).await?,
            platform.resolve_issue_merge_commits(&query_repo, n).await?,
        ),
    };
    let ticket = extract_ticket_number(&details.title);

    if linked.is_empty() {
        info!("No merged PRs found for {} {origin_number}", config.origin_repo);
        return Ok(SyncOutcome::NothingToDo);
    }

    let target = PublishTarget::new(linked.issue.as_ref(), &config.origin_repo, origin_number);

    if prepare_branch(workspace, &target.branch, &settings.base_branch)?
        == BranchOutcome::AlreadyExists
    {
        return Ok(SyncOutcome::BranchExists {
            branch: target.branch,
        });
    }
    tokio::time::sleep(settings.branch_settle()).await;

    let title = target.pr_title(ticket);
    let body = build_pr_description(details.body.as_deref(), &linked.commits);

    let updates = ManifestUpdateSet::from_commits(&linked.commits);
    info!("Updates to be pushed to feature branch: {updates}");

    let changed_files =
        apply_manifest_updates(workspace, &updates, &settings.manifest_extension)?;
    if changed_files.is_empty() {
        return Ok(SyncOutcome::NoChanges {
            branch: target.branch,
        });
    }

    commit_and_push(workspace, &commit_message(&updates))?;

    let pr = open_manifest_pr(
        platform,
        &ManifestPr {
            repo: &config.manifest_repo,
            head: &target.branch,
            base: &settings.base_branch,
            title: &title,
            body: &body,
            label: &settings.automation_label,
            label_color: &settings.automation_label_color,
        },
    )
    .await;

    Ok(SyncOutcome::Published {
        branch: target.branch,
        changed_files,
        pr,
    })
}

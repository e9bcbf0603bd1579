//! GitHub platform access
//!
//! The workflows only talk to GitHub through [`PlatformService`], so the
//! orchestration can be exercised against an in-memory implementation.

mod github;
pub mod graphql;

pub use github::GitHubService;

use crate::error::{Error, Result};
use crate::types::{
    IssueRef, ItemDetails, LinkedMergeCommits, MergeCommit, MergeResponse, PrStatus, PullRequest,
    PullRequestRef, RepoName,
};
use async_trait::async_trait;
use tracing::warn;

/// Platform service trait for the GitHub operations both workflows need
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get the title and body of a PR
    async fn get_pr_details(&self, repo: &RepoName, pr_number: u64) -> Result<ItemDetails>;

    /// Get the title and body of an issue
    async fn get_issue_details(&self, repo: &RepoName, issue_number: u64) -> Result<ItemDetails>;

    /// Discover the merge commits to propagate for a PR.
    ///
    /// Follows the PR's connected events to its first linked issue, then
    /// that issue's connected events to every PR linked to it, keeping the
    /// merged ones. Without a linked issue (or without any merged sibling)
    /// the PR's own merge commit is returned, if it has one.
    ///
    /// A non-200 response yields an empty result rather than an error.
    async fn resolve_linked_merge_commits(
        &self,
        repo: &RepoName,
        pr_number: u64,
    ) -> Result<LinkedMergeCommits>;

    /// List every PR connected to an issue, with gate-relevant fields.
    ///
    /// A non-200 response is an error carrying status and body.
    async fn issue_linked_prs(
        &self,
        repo: &RepoName,
        issue_number: u64,
    ) -> Result<Vec<PullRequestRef>>;

    /// Query a PR's current mergeability, labels and latest review once.
    ///
    /// Returns `None` when the attempt produced no usable answer.
    async fn fetch_pr_status(&self, repo: &RepoName, pr_number: u64) -> Result<Option<PrStatus>>;

    /// Merge a PR through the REST merge endpoint
    async fn merge_pr(&self, repo: &RepoName, pr_number: u64) -> Result<MergeResponse>;

    /// Make sure a label exists on a repository, creating it if absent.
    ///
    /// Returns `true` if the label had to be created.
    async fn ensure_label(&self, repo: &RepoName, name: &str, color: &str) -> Result<bool>;

    /// Open a PR
    async fn create_pr(
        &self,
        repo: &RepoName,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Attach labels to an issue or PR
    async fn add_labels(&self, repo: &RepoName, number: u64, labels: &[String]) -> Result<()>;

    /// Discover the merge commits of every merged PR connected to an issue.
    ///
    /// Single-hop variant of [`resolve_linked_merge_commits`] for callers
    /// that start from the tracking issue. API failures yield an empty
    /// result, matching the PR-based resolver.
    ///
    /// [`resolve_linked_merge_commits`]: Self::resolve_linked_merge_commits
    async fn resolve_issue_merge_commits(
        &self,
        repo: &RepoName,
        issue_number: u64,
    ) -> Result<LinkedMergeCommits> {
        let prs = match self.issue_linked_prs(repo, issue_number).await {
            Ok(prs) => prs,
            Err(Error::GitHubApi(message)) => {
                warn!(%repo, issue_number, %message, "failed to fetch linked PRs");
                return Ok(LinkedMergeCommits::default());
            }
            Err(e) => return Err(e),
        };

        let commits = prs
            .into_iter()
            .filter_map(|pr| {
                pr.merge_commit.map(|sha| MergeCommit {
                    repo: pr.repo,
                    sha,
                })
            })
            .collect();

        Ok(LinkedMergeCommits {
            commits,
            issue: Some(IssueRef {
                repo: repo.full_name(),
                number: issue_number,
            }),
        })
    }
}

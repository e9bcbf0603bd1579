//! Branch names and PR text for manifest updates - pure functions

use crate::manifest::ManifestUpdateSet;
use crate::types::{IssueRef, MergeCommit, RepoName};
use regex::Regex;
use std::sync::LazyLock;

/// Ticket used when the originating title carries none
pub const NO_TICKET: &str = "NO-TICKET";

static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+-[0-9]+").expect("ticket pattern is valid"));

/// First `ABC-123` style ticket identifier in `title`, or [`NO_TICKET`]
pub fn extract_ticket_number(title: &str) -> &str {
    TICKET_PATTERN
        .find(title)
        .map_or(NO_TICKET, |m| m.as_str())
}

/// Where the manifest update goes and what its PR is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Feature branch in the manifest repository
    pub branch: String,
    /// PR title without the ticket prefix
    pub title: String,
}

impl PublishTarget {
    /// Derive the target from the linked issue, falling back to the origin PR.
    ///
    /// The same issue (or, without one, the same PR) always yields the same
    /// branch, so reruns converge on one branch and one PR.
    pub fn new(issue: Option<&IssueRef>, origin_repo: &RepoName, origin_number: u64) -> Self {
        match issue {
            Some(issue) => Self {
                branch: format!("feature_{}_issue_{}", issue.repo, issue.number),
                title: format!("Auto PR for {} {}", issue.repo, issue.number),
            },
            None => Self {
                branch: format!("feature_{}_pr_{origin_number}", origin_repo.name),
                title: format!("Auto PR for {origin_repo} {origin_number}"),
            },
        }
    }

    /// Full PR title with the ticket prefix
    pub fn pr_title(&self, ticket: &str) -> String {
        format!("{ticket} - {}", self.title)
    }
}

/// Human-readable list of every repository and merge commit involved
pub fn build_pr_list_description(commits: &[MergeCommit]) -> String {
    let mut list = String::from("\n\nList of PRs and Repositories Involved:\n");
    for commit in commits {
        list.push_str(&format!(
            "- Repository: {}, Merge Commit SHA: {}\n",
            commit.repo, commit.sha
        ));
    }
    list
}

/// Body of the manifest PR
pub fn build_pr_description(origin_body: Option<&str>, commits: &[MergeCommit]) -> String {
    format!(
        "Details: {}\n{}",
        origin_body.unwrap_or_default(),
        build_pr_list_description(commits)
    )
}

/// Commit message for the manifest change
pub fn commit_message(updates: &ManifestUpdateSet) -> String {
    let projects: Vec<&str> = updates.project_names().collect();
    format!("Update manifest for {}", projects.join(","))
}

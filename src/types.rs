//! Core types for bhc-workflow

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A repository identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoName {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name without the owner
    pub name: String,
}

impl RepoName {
    /// Create a repository name from its parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::InvalidRepoName(s.to_string())),
        }
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Last path segment of a repository full name (`org/repo` -> `repo`)
///
/// Manifest projects are keyed by this short name.
pub fn short_repo_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// Mergeability as computed by GitHub
///
/// `Unknown` means GitHub has not finished computing it yet and the value
/// must be re-queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeableState {
    /// No conflicts with the base branch
    Mergeable,
    /// Conflicts with the base branch
    Conflicting,
    /// Still being computed
    Unknown,
}

impl MergeableState {
    /// Whether this value is authoritative
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mergeable => write!(f, "MERGEABLE"),
            Self::Conflicting => write!(f, "CONFLICTING"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// State of a pull request review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Approved
    Approved,
    /// Changes requested
    ChangesRequested,
    /// Comment only
    Commented,
    /// Dismissed
    Dismissed,
    /// Not yet submitted
    Pending,
    /// Anything GitHub adds later
    #[serde(other)]
    Other,
}

/// A pull request linked to a tracking issue, as seen by the merge gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository the PR belongs to (`owner/name`)
    pub repo: String,
    /// PR number
    pub number: u64,
    /// Merge commit SHA, if merged
    pub merge_commit: Option<String>,
    /// Mergeability, possibly still `Unknown`
    pub mergeable: MergeableState,
    /// Label names on the PR
    pub labels: Vec<String>,
    /// Review states, oldest first (queries request only the latest one)
    pub reviews: Vec<ReviewState>,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
}

impl PullRequestRef {
    /// Whether `label` is attached
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Most recent review state
    pub fn latest_review(&self) -> Option<&ReviewState> {
        self.reviews.last()
    }

    /// Whether the most recent review approves the PR
    ///
    /// Earlier reviews are not consulted: a rejection followed by an
    /// approval counts as approved.
    pub fn is_approved(&self) -> bool {
        self.latest_review() == Some(&ReviewState::Approved)
    }

    /// Replace the polled fields with a fresher snapshot
    pub fn refresh_from(&mut self, status: PrStatus) {
        self.mergeable = status.mergeable;
        self.labels = status.labels;
        self.reviews = status.reviews;
    }
}

/// Freshly polled mergeability, labels and reviews for one PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrStatus {
    /// PR number
    pub number: u64,
    /// Mergeability
    pub mergeable: MergeableState,
    /// Label names
    pub labels: Vec<String>,
    /// Review states, oldest first
    pub reviews: Vec<ReviewState>,
}

/// A tracking issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// Repository the issue lives in (`owner/name`)
    pub repo: String,
    /// Issue number
    pub number: u64,
}

/// A merged PR's repository and merge commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCommit {
    /// Repository full name (`owner/name`)
    pub repo: String,
    /// Merge commit SHA
    pub sha: String,
}

/// Resolver output: merge commits to propagate and the connecting issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedMergeCommits {
    /// Merge commits to write into the manifest
    pub commits: Vec<MergeCommit>,
    /// Issue connected to the originating PR, if any
    pub issue: Option<IssueRef>,
}

impl LinkedMergeCommits {
    /// Nothing to propagate
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// A pull request as returned on creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Title and body of an existing issue or PR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetails {
    /// Issue or PR number
    pub number: u64,
    /// Title
    pub title: String,
    /// Body/description
    pub body: Option<String>,
}

/// Outcome of a REST merge request
///
/// GitHub answers non-mergeable requests with a 4xx status and a message,
/// so this is a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResponse {
    /// HTTP status code
    pub status: u16,
    /// `message` field of the response body
    pub message: Option<String>,
}

impl MergeResponse {
    /// Whether GitHub reported the merge as done
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

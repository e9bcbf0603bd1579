//! GraphQL queries and the pure interpretation of their responses.
//!
//! GitHub has no direct "all PRs for this issue" edge, so linked PRs are
//! reconstructed from `CONNECTED_EVENT` timeline items on both sides.

use crate::error::{Error, Result};
use crate::types::{
    IssueRef, LinkedMergeCommits, MergeCommit, MergeableState, PrStatus, PullRequestRef,
    ReviewState,
};
use serde::Deserialize;

/// PR -> connected issue -> connected PRs, for manifest propagation
pub const PR_LINKS_QUERY: &str = r"
query($repoOwner: String!, $repoName: String!, $prNumber: Int!) {
  repository(owner: $repoOwner, name: $repoName) {
    pullRequest(number: $prNumber) {
      merged
      mergeCommit { oid }
      repository { nameWithOwner }
      timelineItems(last: 100, itemTypes: [CONNECTED_EVENT]) {
        nodes {
          ... on ConnectedEvent {
            subject {
              __typename
              ... on Issue {
                number
                repository { nameWithOwner }
                timelineItems(last: 100, itemTypes: [CONNECTED_EVENT]) {
                  nodes {
                    ... on ConnectedEvent {
                      subject {
                        __typename
                        ... on PullRequest {
                          number
                          merged
                          mergeCommit { oid }
                          repository { nameWithOwner }
                        }
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
";

/// Issue -> connected PRs, for the merge gate
pub const ISSUE_LINKS_QUERY: &str = r"
query($org: String!, $repo: String!, $number: Int!) {
  repository(owner: $org, name: $repo) {
    issue(number: $number) {
      timelineItems(itemTypes: [CONNECTED_EVENT], last: 100) {
        nodes {
          ... on ConnectedEvent {
            subject {
              __typename
              ... on PullRequest {
                number
                merged
                mergeCommit { oid }
                baseRefName
                headRefName
                mergeable
                labels(first: 10) { nodes { name } }
                reviews(last: 1) { nodes { state } }
                repository { nameWithOwner }
              }
            }
          }
        }
      }
    }
  }
}
";

/// Single PR mergeability, labels and latest review, for polling
pub const PR_STATUS_QUERY: &str = r"
query($org: String!, $repo: String!, $number: Int!) {
  repository(owner: $org, name: $repo) {
    pullRequest(number: $number) {
      number
      mergeable
      labels(first: 10) { nodes { name } }
      reviews(last: 1) { nodes { state } }
    }
  }
}
";

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    /// Extract the data, turning reported errors into [`Error::GraphQl`].
    ///
    /// Partial data alongside errors is still returned.
    pub fn into_data(self) -> Result<T> {
        match (self.data, self.errors) {
            (Some(data), _) => Ok(data),
            (None, Some(errors)) if !errors.is_empty() => {
                let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
                Err(Error::GraphQl(messages.join(", ")))
            }
            (None, _) => Err(Error::GraphQl("No data in GraphQL response".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameWithOwner {
    name_with_owner: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    oid: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<Option<T>>,
}

impl<T> Nodes<T> {
    fn into_items(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

/// A timeline node; nodes that are not connected events come back empty
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
struct ConnectedEvent<S> {
    #[serde(default)]
    subject: Option<S>,
}

// --- PR -> issue -> PRs ---

/// `data` of [`PR_LINKS_QUERY`]
#[derive(Debug, Deserialize)]
pub struct PrLinksData {
    repository: Option<PrLinksRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrLinksRepository {
    pull_request: Option<OriginPr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OriginPr {
    merged: bool,
    merge_commit: Option<Commit>,
    repository: NameWithOwner,
    timeline_items: Nodes<ConnectedEvent<OriginSubject>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum OriginSubject {
    Issue(LinkedIssue),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedIssue {
    number: u64,
    repository: NameWithOwner,
    timeline_items: Nodes<ConnectedEvent<IssueSubject>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum IssueSubject {
    PullRequest(LinkedPr),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedPr {
    merged: bool,
    merge_commit: Option<Commit>,
    repository: NameWithOwner,
}

impl LinkedPr {
    fn into_merge_commit(self) -> Option<MergeCommit> {
        if !self.merged {
            return None;
        }
        self.merge_commit.map(|c| MergeCommit {
            repo: self.repository.name_with_owner,
            sha: c.oid,
        })
    }
}

/// Interpret a [`PR_LINKS_QUERY`] response.
///
/// Only the first connected issue is followed. Returns `None` when the
/// repository or PR does not exist.
pub fn interpret_pr_links(data: PrLinksData) -> Option<LinkedMergeCommits> {
    let origin = data.repository?.pull_request?;

    let origin_commit = LinkedPr {
        merged: origin.merged,
        merge_commit: origin.merge_commit,
        repository: origin.repository,
    }
    .into_merge_commit();

    let linked_issue = origin
        .timeline_items
        .into_items()
        .find_map(|event| match event.subject {
            Some(OriginSubject::Issue(issue)) => Some(issue),
            _ => None,
        });

    let mut commits = Vec::new();
    let issue = linked_issue.map(|issue| {
        commits.extend(
            issue
                .timeline_items
                .into_items()
                .filter_map(|event| match event.subject {
                    Some(IssueSubject::PullRequest(pr)) => pr.into_merge_commit(),
                    _ => None,
                }),
        );
        IssueRef {
            repo: issue.repository.name_with_owner,
            number: issue.number,
        }
    });

    if commits.is_empty()
        && let Some(commit) = origin_commit
    {
        commits.push(commit);
    }

    Some(LinkedMergeCommits { commits, issue })
}

// --- issue -> PRs ---

/// `data` of [`ISSUE_LINKS_QUERY`]
#[derive(Debug, Deserialize)]
pub struct IssueLinksData {
    repository: Option<IssueLinksRepository>,
}

#[derive(Debug, Deserialize)]
struct IssueLinksRepository {
    issue: Option<TrackingIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackingIssue {
    timeline_items: Nodes<ConnectedEvent<GateSubject>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum GateSubject {
    PullRequest(GatePr),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatePr {
    number: u64,
    merged: bool,
    merge_commit: Option<Commit>,
    base_ref_name: String,
    head_ref_name: String,
    mergeable: MergeableState,
    labels: Nodes<LabelNode>,
    reviews: Nodes<ReviewNode>,
    repository: NameWithOwner,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ReviewNode {
    state: ReviewState,
}

/// Interpret an [`ISSUE_LINKS_QUERY`] response.
///
/// A PR connected more than once appears once. Returns `None` when the
/// repository or issue does not exist.
pub fn interpret_issue_links(data: IssueLinksData) -> Option<Vec<PullRequestRef>> {
    let issue = data.repository?.issue?;

    let mut prs: Vec<PullRequestRef> = Vec::new();
    for event in issue.timeline_items.into_items() {
        let Some(GateSubject::PullRequest(pr)) = event.subject else {
            continue;
        };
        let repo = pr.repository.name_with_owner;
        if prs.iter().any(|p| p.repo == repo && p.number == pr.number) {
            continue;
        }
        prs.push(PullRequestRef {
            repo,
            number: pr.number,
            merge_commit: pr
                .merge_commit
                .filter(|_| pr.merged)
                .map(|c| c.oid),
            mergeable: pr.mergeable,
            labels: pr.labels.into_items().map(|l| l.name).collect(),
            reviews: pr.reviews.into_items().map(|r| r.state).collect(),
            base_ref: pr.base_ref_name,
            head_ref: pr.head_ref_name,
        });
    }

    Some(prs)
}

// --- single PR status ---

/// `data` of [`PR_STATUS_QUERY`]
#[derive(Debug, Deserialize)]
pub struct PrStatusData {
    repository: Option<PrStatusRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrStatusRepository {
    pull_request: Option<StatusPr>,
}

#[derive(Debug, Deserialize)]
struct StatusPr {
    number: u64,
    mergeable: MergeableState,
    labels: Nodes<LabelNode>,
    reviews: Nodes<ReviewNode>,
}

/// Interpret a [`PR_STATUS_QUERY`] response
pub fn interpret_pr_status(data: PrStatusData) -> Option<PrStatus> {
    let pr = data.repository?.pull_request?;
    Some(PrStatus {
        number: pr.number,
        mergeable: pr.mergeable,
        labels: pr.labels.into_items().map(|l| l.name).collect(),
        reviews: pr.reviews.into_items().map(|r| r.state).collect(),
    })
}

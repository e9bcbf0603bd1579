//! Shared test utilities

#![allow(dead_code)]

mod mock_platform;
mod mock_workspace;

pub use mock_platform::{CreatePrCall, MockPlatformService};
pub use mock_workspace::{GitCall, MockWorkspace};

use bhc_workflow::config::Settings;
use bhc_workflow::types::{MergeableState, PrStatus, PullRequestRef, ReviewState};

/// Settings with every delay removed
pub fn fast_settings() -> Settings {
    Settings {
        poll_delay_secs: 0,
        branch_settle_secs: 0,
        ..Settings::default()
    }
}

/// A linked PR as the issue query would report it
pub fn linked_pr(
    repo: &str,
    number: u64,
    mergeable: MergeableState,
    labels: &[&str],
    reviews: &[ReviewState],
) -> PullRequestRef {
    PullRequestRef {
        repo: repo.to_string(),
        number,
        merge_commit: None,
        mergeable,
        labels: labels.iter().map(ToString::to_string).collect(),
        reviews: reviews.to_vec(),
        base_ref: "develop".to_string(),
        head_ref: format!("feature-{number}"),
    }
}

/// A linked PR that passes the gate
pub fn eligible_pr(repo: &str, number: u64) -> PullRequestRef {
    linked_pr(
        repo,
        number,
        MergeableState::Mergeable,
        &["CCI-Verified"],
        &[ReviewState::Approved],
    )
}

/// A merged linked PR
pub fn merged_pr(repo: &str, number: u64, sha: &str) -> PullRequestRef {
    PullRequestRef {
        merge_commit: Some(sha.to_string()),
        ..eligible_pr(repo, number)
    }
}

/// A polled status
pub fn status(
    number: u64,
    mergeable: MergeableState,
    labels: &[&str],
    reviews: &[ReviewState],
) -> PrStatus {
    PrStatus {
        number,
        mergeable,
        labels: labels.iter().map(ToString::to_string).collect(),
        reviews: reviews.to_vec(),
    }
}

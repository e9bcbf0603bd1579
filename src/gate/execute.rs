//! Gate execution - merge every PR of an approved batch

use crate::platform::PlatformService;
use crate::types::{MergeResponse, PullRequestRef, RepoName};
use tracing::{info, warn};

/// Result of one merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Repository the PR belongs to (`owner/name`)
    pub repo: String,
    /// PR number
    pub number: u64,
    /// What GitHub answered, or why the request never got an answer
    pub response: std::result::Result<MergeResponse, String>,
}

impl MergeOutcome {
    /// Whether GitHub reported the merge as done
    pub fn is_success(&self) -> bool {
        self.response.as_ref().is_ok_and(MergeResponse::is_success)
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.response {
            Ok(response) => write!(
                f,
                "Merge PR {} {}: HTTP {} - {}",
                self.repo,
                self.number,
                response.status,
                response.message.as_deref().unwrap_or("No message")
            ),
            Err(error) => write!(
                f,
                "Merge PR {} {}: request failed - {error}",
                self.repo, self.number
            ),
        }
    }
}

/// Merge each PR in order (EFFECTFUL)
///
/// Every PR is attempted. Rejected merges and failed requests are
/// reported, not retried, and do not stop the remaining ones.
pub async fn execute_merges(
    prs: &[PullRequestRef],
    platform: &dyn PlatformService,
) -> Vec<MergeOutcome> {
    let mut outcomes = Vec::with_capacity(prs.len());

    for pr in prs {
        let response = match pr.repo.parse::<RepoName>() {
            Ok(repo) => platform
                .merge_pr(&repo, pr.number)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let outcome = MergeOutcome {
            repo: pr.repo.clone(),
            number: pr.number,
            response,
        };
        if outcome.is_success() {
            info!("{outcome}");
        } else {
            warn!("{outcome}");
        }
        outcomes.push(outcome);
    }

    outcomes
}

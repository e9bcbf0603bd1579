//! Merge gate for the PRs linked to a tracking issue
//!
//! Three phases, like the publisher:
//! 1. Gather - list linked PRs and poll each one's mergeability (effectful)
//! 2. Evaluate - all-or-nothing verdict (pure, testable)
//! 3. Execute - merge every PR (effectful)

mod execute;
mod plan;
mod poll;

pub use execute::{MergeOutcome, execute_merges};
pub use plan::{GateBlocker, GateDecision, check_pr, evaluate_gate};
pub use poll::poll_mergeable;

use crate::config::Settings;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PullRequestRef, RepoName};
use tracing::{debug, info};

/// Inputs of one gate run
#[derive(Debug, Clone)]
pub struct MergeGateConfig {
    /// Repository holding the tracking issue
    pub repo: RepoName,
    /// Tracking issue number
    pub issue_number: u64,
    /// Evaluate and report without merging
    pub dry_run: bool,
}

/// What a gate run saw and did
#[derive(Debug, Clone)]
pub struct GateReport {
    /// Linked PRs after polling
    pub prs: Vec<PullRequestRef>,
    /// Verdict on the batch
    pub decision: GateDecision,
    /// Merge results; empty when blocked or in dry-run mode
    pub merges: Vec<MergeOutcome>,
}

impl GateReport {
    /// Whether the gate let the batch through
    pub const fn passed(&self) -> bool {
        self.decision.is_mergeable()
    }
}

/// Poll every PR, keeping the issue-query values for unresolved ones
async fn gather(
    platform: &dyn PlatformService,
    settings: &Settings,
    mut prs: Vec<PullRequestRef>,
) -> Result<Vec<PullRequestRef>> {
    for pr in &mut prs {
        let repo: RepoName = pr.repo.parse()?;
        match poll_mergeable(
            platform,
            &repo,
            pr.number,
            settings.poll_attempts,
            settings.poll_delay(),
        )
        .await?
        {
            Some(status) => pr.refresh_from(status),
            None => debug!(%repo, number = pr.number, "mergeability unresolved, keeping last known state"),
        }
    }
    Ok(prs)
}

/// Run the merge gate end to end.
pub async fn run_merge_gate(
    config: &MergeGateConfig,
    settings: &Settings,
    platform: &dyn PlatformService,
) -> Result<GateReport> {
    let linked = platform
        .issue_linked_prs(&config.repo, config.issue_number)
        .await?;
    info!(
        "Found {} PR(s) linked to {}#{}",
        linked.len(),
        config.repo,
        config.issue_number
    );

    let prs = gather(platform, settings, linked).await?;
    let decision = evaluate_gate(&prs, &settings.required_label);

    let merges = match &decision {
        GateDecision::MergeAll(batch) if !config.dry_run => execute_merges(batch, platform).await,
        _ => Vec::new(),
    };

    Ok(GateReport {
        prs,
        decision,
        merges,
    })
}

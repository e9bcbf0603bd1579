//! Gate evaluation - pure functions over already-polled PRs
//!
//! No I/O happens here: the caller polls and refreshes every linked PR
//! first, then asks for a verdict on the whole batch.

use crate::types::{MergeableState, PullRequestRef};

/// Why one linked PR may not be merged, with the observed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateBlocker {
    /// Repository the PR belongs to (`owner/name`)
    pub repo: String,
    /// PR number
    pub number: u64,
    /// Observed mergeability
    pub mergeable: MergeableState,
    /// Label the gate requires
    pub required_label: String,
    /// Whether the required label was present
    pub label_present: bool,
    /// Whether the latest review approves the PR
    pub approved: bool,
}

impl std::fmt::Display for GateBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PR #{} in {} cannot be merged. Mergeable: {}, {}: {}, Approved: {}",
            self.number,
            self.repo,
            self.mergeable,
            self.required_label,
            bool_word(self.label_present),
            bool_word(self.approved)
        )
    }
}

const fn bool_word(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Verdict on a batch of linked PRs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Every PR is eligible; merge them in this order
    MergeAll(Vec<PullRequestRef>),
    /// At least one PR is ineligible; nothing may be merged
    Blocked(Vec<GateBlocker>),
}

impl GateDecision {
    /// Whether the batch may be merged
    #[must_use]
    pub const fn is_mergeable(&self) -> bool {
        matches!(self, Self::MergeAll(_))
    }
}

/// Check one PR against the gate, returning the blocker if it fails
#[must_use]
pub fn check_pr(pr: &PullRequestRef, required_label: &str) -> Option<GateBlocker> {
    let label_present = pr.has_label(required_label);
    let approved = pr.is_approved();

    if pr.mergeable == MergeableState::Mergeable && label_present && approved {
        return None;
    }

    Some(GateBlocker {
        repo: pr.repo.clone(),
        number: pr.number,
        mergeable: pr.mergeable,
        required_label: required_label.to_string(),
        label_present,
        approved,
    })
}

/// Evaluate the gate over every linked PR (PURE - no I/O)
///
/// All PRs are checked even after the first failure so the report lists
/// every blocker at once.
#[must_use]
pub fn evaluate_gate(prs: &[PullRequestRef], required_label: &str) -> GateDecision {
    let blockers: Vec<GateBlocker> = prs
        .iter()
        .filter_map(|pr| check_pr(pr, required_label))
        .collect();

    if blockers.is_empty() {
        GateDecision::MergeAll(prs.to_vec())
    } else {
        GateDecision::Blocked(blockers)
    }
}

//! Mergeability polling

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PrStatus, RepoName};
use std::time::Duration;
use tracing::debug;

/// Re-query a PR until GitHub reports an authoritative mergeable state.
///
/// Makes at most `attempts` queries with `delay` between them and returns
/// the first status whose mergeability is not `UNKNOWN`. Returns `None`
/// when every attempt was unknown or unusable; the caller keeps its
/// previous values in that case.
pub async fn poll_mergeable(
    platform: &dyn PlatformService,
    repo: &RepoName,
    pr_number: u64,
    attempts: u32,
    delay: Duration,
) -> Result<Option<PrStatus>> {
    for attempt in 1..=attempts {
        if let Some(status) = platform.fetch_pr_status(repo, pr_number).await?
            && status.mergeable.is_known()
        {
            debug!(%repo, pr_number, attempt, mergeable = %status.mergeable, "mergeability resolved");
            return Ok(Some(status));
        }

        debug!(%repo, pr_number, attempt, attempts, "mergeability not yet known");
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(None)
}

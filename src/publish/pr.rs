//! Opening the manifest PR

use crate::platform::PlatformService;
use crate::types::{PullRequest, RepoName};
use tracing::{info, warn};

/// What to open and how to label it
#[derive(Debug, Clone)]
pub struct ManifestPr<'a> {
    /// Manifest repository
    pub repo: &'a RepoName,
    /// Feature branch
    pub head: &'a str,
    /// Integration branch
    pub base: &'a str,
    /// PR title
    pub title: &'a str,
    /// PR body
    pub body: &'a str,
    /// Automation label attached after creation
    pub label: &'a str,
    /// Color for the label if it has to be created
    pub label_color: &'a str,
}

/// Open the manifest PR and attach the automation label.
///
/// Failures are logged, not returned: the branch and commit already exist
/// and stay in place. Returns the PR when it was created.
pub async fn open_manifest_pr(
    platform: &dyn PlatformService,
    request: &ManifestPr<'_>,
) -> Option<PullRequest> {
    match platform
        .ensure_label(request.repo, request.label, request.label_color)
        .await
    {
        Ok(true) => info!("Label '{}' created.", request.label),
        Ok(false) => info!("Label '{}' already exists.", request.label),
        Err(e) => warn!("Failed to ensure label '{}': {e}", request.label),
    }

    let pr = match platform
        .create_pr(
            request.repo,
            request.head,
            request.base,
            request.title,
            request.body,
        )
        .await
    {
        Ok(pr) => pr,
        Err(e) => {
            warn!("Failed to create PR: {e}");
            return None;
        }
    };

    if let Err(e) = platform
        .add_labels(request.repo, pr.number, &[request.label.to_string()])
        .await
    {
        warn!(pr_number = pr.number, "Failed to label PR: {e}");
    } else {
        info!("PR Created and labeled: {}", pr.html_url);
    }

    Some(pr)
}

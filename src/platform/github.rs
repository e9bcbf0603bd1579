//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::platform::graphql::{
    GraphQlResponse, ISSUE_LINKS_QUERY, IssueLinksData, PR_LINKS_QUERY, PR_STATUS_QUERY,
    PrLinksData, PrStatusData, interpret_issue_links, interpret_pr_links, interpret_pr_status,
};
use crate::types::{
    ItemDetails, LinkedMergeCommits, MergeResponse, PrStatus, PullRequest, PullRequestRef,
    RepoName,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub service using octocrab for REST and reqwest for GraphQL
///
/// GraphQL and the merge endpoint go through reqwest so the HTTP status is
/// visible: both workflows treat non-200 answers as data, not failures.
pub struct GitHubService {
    client: Octocrab,
    /// HTTP client for GraphQL and merge requests
    http_client: Client,
    token: String,
    graphql_url: String,
    api_url: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` is the REST root (`https://api.github.com` or an
    /// Enterprise `https://host/api/v3`).
    pub fn new(token: &str, graphql_url: &str, api_url: &str) -> Result<Self> {
        let api_url = api_url.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("bhc-workflow")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            http_client,
            token: token.to_string(),
            graphql_url: graphql_url.to_string(),
            api_url,
        })
    }

    /// POST a GraphQL query, returning the raw response for status handling
    async fn post_graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(&self.graphql_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        Ok(response)
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr_details(&self, repo: &RepoName, pr_number: u64) -> Result<ItemDetails> {
        debug!(%repo, pr_number, "getting PR details");
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .get(pr_number)
            .await?;

        Ok(ItemDetails {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            body: pr.body.clone(),
        })
    }

    async fn get_issue_details(&self, repo: &RepoName, issue_number: u64) -> Result<ItemDetails> {
        debug!(%repo, issue_number, "getting issue details");
        let issue = self
            .client
            .issues(&repo.owner, &repo.name)
            .get(issue_number)
            .await?;

        Ok(ItemDetails {
            number: issue.number,
            title: issue.title,
            body: issue.body,
        })
    }

    async fn resolve_linked_merge_commits(
        &self,
        repo: &RepoName,
        pr_number: u64,
    ) -> Result<LinkedMergeCommits> {
        debug!(%repo, pr_number, "resolving linked merge commits");
        let response = self
            .post_graphql(
                PR_LINKS_QUERY,
                serde_json::json!({
                    "repoOwner": repo.owner,
                    "repoName": repo.name,
                    "prNumber": pr_number,
                }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Failed to fetch linked PRs");
            return Ok(LinkedMergeCommits::default());
        }

        let data = match response
            .json::<GraphQlResponse<PrLinksData>>()
            .await?
            .into_data()
        {
            Ok(data) => data,
            Err(e) => {
                warn!(%repo, pr_number, error = %e, "Linked PR query returned no data");
                return Ok(LinkedMergeCommits::default());
            }
        };

        let Some(linked) = interpret_pr_links(data) else {
            warn!(%repo, pr_number, "pull request not found");
            return Ok(LinkedMergeCommits::default());
        };

        debug!(
            count = linked.commits.len(),
            issue = ?linked.issue,
            "resolved linked merge commits"
        );
        Ok(linked)
    }

    async fn issue_linked_prs(
        &self,
        repo: &RepoName,
        issue_number: u64,
    ) -> Result<Vec<PullRequestRef>> {
        debug!(%repo, issue_number, "listing PRs linked to issue");
        let response = self
            .post_graphql(
                ISSUE_LINKS_QUERY,
                serde_json::json!({
                    "org": repo.owner,
                    "repo": repo.name,
                    "number": issue_number,
                }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "GraphQL query failed with status {}. Response: {body}",
                status.as_u16()
            )));
        }

        let data = response
            .json::<GraphQlResponse<IssueLinksData>>()
            .await?
            .into_data()?;

        let prs = interpret_issue_links(data).ok_or_else(|| {
            Error::GitHubApi(format!("issue #{issue_number} not found in {repo}"))
        })?;

        debug!(count = prs.len(), "listed linked PRs");
        Ok(prs)
    }

    async fn fetch_pr_status(&self, repo: &RepoName, pr_number: u64) -> Result<Option<PrStatus>> {
        let response = self
            .post_graphql(
                PR_STATUS_QUERY,
                serde_json::json!({
                    "org": repo.owner,
                    "repo": repo.name,
                    "number": pr_number,
                }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%repo, pr_number, %status, "PR status query returned non-200");
            return Ok(None);
        }

        match response
            .json::<GraphQlResponse<PrStatusData>>()
            .await?
            .into_data()
        {
            Ok(data) => Ok(interpret_pr_status(data)),
            Err(e) => {
                debug!(%repo, pr_number, error = %e, "PR status query returned errors");
                Ok(None)
            }
        }
    }

    async fn merge_pr(&self, repo: &RepoName, pr_number: u64) -> Result<MergeResponse> {
        #[derive(Deserialize)]
        struct MergeBody {
            message: Option<String>,
        }

        debug!(%repo, pr_number, "merging PR");
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/merge",
            self.api_url, repo.owner, repo.name, pr_number
        );

        let response = self
            .http_client
            .put(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status().as_u16();
        let message = response
            .json::<MergeBody>()
            .await
            .ok()
            .and_then(|body| body.message);

        debug!(%repo, pr_number, status, ?message, "merge request complete");
        Ok(MergeResponse { status, message })
    }

    async fn ensure_label(&self, repo: &RepoName, name: &str, color: &str) -> Result<bool> {
        debug!(%repo, name, "ensuring label exists");
        let issues = self.client.issues(&repo.owner, &repo.name);
        let first_page = issues.list_labels_for_repo().per_page(100).send().await?;
        let labels = self.client.all_pages(first_page).await?;

        if labels.iter().any(|label| label.name == name) {
            debug!(name, "label already exists");
            return Ok(false);
        }

        issues.create_label(name, color, "").await?;
        debug!(name, color, "label created");
        Ok(true)
    }

    async fn create_pr(
        &self,
        repo: &RepoName,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(%repo, head, base, "creating PR");
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn add_labels(&self, repo: &RepoName, number: u64, labels: &[String]) -> Result<()> {
        debug!(%repo, number, ?labels, "adding labels");
        self.client
            .issues(&repo.owner, &repo.name)
            .add_labels(number, labels)
            .await?;
        Ok(())
    }
}

//! Mock platform service for testing

use async_trait::async_trait;
use bhc_workflow::error::{Error, Result};
use bhc_workflow::platform::PlatformService;
use bhc_workflow::types::{
    ItemDetails, LinkedMergeCommits, MergeResponse, PrStatus, PullRequest, PullRequestRef,
    RepoName,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub repo: String,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// In-memory `PlatformService` with scripted responses and call tracking
///
/// Features:
/// - Auto-incrementing PR numbers for created PRs
/// - Per-PR queues of poll answers (`None` entries model unusable answers)
/// - Error injection for the soft-failure paths
pub struct MockPlatformService {
    next_pr_number: AtomicU64,
    details: Mutex<ItemDetails>,
    linked_commits: Mutex<LinkedMergeCommits>,
    linked_prs: Mutex<Vec<PullRequestRef>>,
    status_responses: Mutex<HashMap<u64, VecDeque<Option<PrStatus>>>>,
    merge_responses: Mutex<HashMap<u64, MergeResponse>>,
    existing_labels: Mutex<Vec<String>>,
    // Call tracking
    resolve_calls: Mutex<Vec<(String, u64)>>,
    status_calls: Mutex<Vec<(String, u64)>>,
    merge_calls: Mutex<Vec<(String, u64)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    label_calls: Mutex<Vec<(u64, Vec<String>)>>,
    // Error injection
    error_on_issue_query: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_ensure_label: Mutex<Option<String>>,
    error_on_merge: Mutex<HashMap<u64, String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(100),
            details: Mutex::new(ItemDetails {
                number: 1,
                title: "RDKB-1234: fix build".to_string(),
                body: Some("Fixes the build".to_string()),
            }),
            linked_commits: Mutex::new(LinkedMergeCommits::default()),
            linked_prs: Mutex::new(Vec::new()),
            status_responses: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            existing_labels: Mutex::new(Vec::new()),
            resolve_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            label_calls: Mutex::new(Vec::new()),
            error_on_issue_query: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_ensure_label: Mutex::new(None),
            error_on_merge: Mutex::new(HashMap::new()),
        }
    }

    // === Response setup ===

    pub fn set_details(&self, title: &str, body: Option<&str>) {
        let mut details = self.details.lock().unwrap();
        details.title = title.to_string();
        details.body = body.map(ToString::to_string);
    }

    pub fn set_linked_commits(&self, linked: LinkedMergeCommits) {
        *self.linked_commits.lock().unwrap() = linked;
    }

    pub fn set_linked_prs(&self, prs: Vec<PullRequestRef>) {
        *self.linked_prs.lock().unwrap() = prs;
    }

    /// Queue poll answers for a PR; an exhausted queue answers `None`
    pub fn queue_status(&self, pr_number: u64, answers: Vec<Option<PrStatus>>) {
        self.status_responses
            .lock()
            .unwrap()
            .insert(pr_number, answers.into());
    }

    pub fn set_merge_response(&self, pr_number: u64, status: u16, message: Option<&str>) {
        self.merge_responses.lock().unwrap().insert(
            pr_number,
            MergeResponse {
                status,
                message: message.map(ToString::to_string),
            },
        );
    }

    pub fn add_existing_label(&self, name: &str) {
        self.existing_labels.lock().unwrap().push(name.to_string());
    }

    // === Error injection ===

    pub fn fail_issue_query(&self, msg: &str) {
        *self.error_on_issue_query.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_ensure_label(&self, msg: &str) {
        *self.error_on_ensure_label.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` fail for one PR without an HTTP answer
    pub fn fail_merge(&self, pr_number: u64, msg: &str) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    // === Call inspection ===

    pub fn resolve_calls(&self) -> Vec<(String, u64)> {
        self.resolve_calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<(String, u64)> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<(String, u64)> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn label_calls(&self) -> Vec<(u64, Vec<String>)> {
        self.label_calls.lock().unwrap().clone()
    }

    pub fn existing_labels(&self) -> Vec<String> {
        self.existing_labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr_details(&self, _repo: &RepoName, pr_number: u64) -> Result<ItemDetails> {
        let mut details = self.details.lock().unwrap().clone();
        details.number = pr_number;
        Ok(details)
    }

    async fn get_issue_details(&self, _repo: &RepoName, issue_number: u64) -> Result<ItemDetails> {
        let mut details = self.details.lock().unwrap().clone();
        details.number = issue_number;
        Ok(details)
    }

    async fn resolve_linked_merge_commits(
        &self,
        repo: &RepoName,
        pr_number: u64,
    ) -> Result<LinkedMergeCommits> {
        self.resolve_calls
            .lock()
            .unwrap()
            .push((repo.full_name(), pr_number));
        Ok(self.linked_commits.lock().unwrap().clone())
    }

    async fn issue_linked_prs(
        &self,
        _repo: &RepoName,
        _issue_number: u64,
    ) -> Result<Vec<PullRequestRef>> {
        if let Some(msg) = self.error_on_issue_query.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.linked_prs.lock().unwrap().clone())
    }

    async fn fetch_pr_status(&self, repo: &RepoName, pr_number: u64) -> Result<Option<PrStatus>> {
        self.status_calls
            .lock()
            .unwrap()
            .push((repo.full_name(), pr_number));
        Ok(self
            .status_responses
            .lock()
            .unwrap()
            .get_mut(&pr_number)
            .and_then(VecDeque::pop_front)
            .flatten())
    }

    async fn merge_pr(&self, repo: &RepoName, pr_number: u64) -> Result<MergeResponse> {
        self.merge_calls
            .lock()
            .unwrap()
            .push((repo.full_name(), pr_number));
        if let Some(msg) = self.error_on_merge.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or(MergeResponse {
                status: 200,
                message: Some("Pull Request successfully merged".to_string()),
            }))
    }

    async fn ensure_label(&self, _repo: &RepoName, name: &str, _color: &str) -> Result<bool> {
        if let Some(msg) = self.error_on_ensure_label.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        let mut labels = self.existing_labels.lock().unwrap();
        if labels.iter().any(|l| l == name) {
            return Ok(false);
        }
        labels.push(name.to_string());
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
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            repo: repo.full_name(),
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{repo}/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    async fn add_labels(&self, _repo: &RepoName, number: u64, labels: &[String]) -> Result<()> {
        self.label_calls
            .lock()
            .unwrap()
            .push((number, labels.to_vec()));
        Ok(())
    }
}

//! Mock git workspace for testing

use bhc_workflow::error::Result;
use bhc_workflow::repo::Workspace;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Call record for every `Workspace` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch(String),
    RemoteBranches,
    Checkout(String),
    Pull(String, String),
    CreateBranch(String),
    Push(String, String),
    StageAll,
    IsDirty,
    Commit(String),
    CurrentBranch,
}

/// `Workspace` over a plain directory that records calls instead of running git
///
/// Manifest files live in `root`, so the real manifest rewrite runs against
/// them. The working copy reports dirty once `stage_all` has been called
/// and clean again after a commit.
pub struct MockWorkspace {
    root: PathBuf,
    remote_branches: Mutex<Vec<String>>,
    current_branch: Mutex<String>,
    staged: Mutex<bool>,
    calls: Mutex<Vec<GitCall>>,
}

impl MockWorkspace {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            remote_branches: Mutex::new(vec!["origin/develop".to_string()]),
            current_branch: Mutex::new("develop".to_string()),
            staged: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pretend `branch` already exists on origin
    pub fn add_remote_branch(&self, branch: &str) {
        self.remote_branches
            .lock()
            .unwrap()
            .push(format!("origin/{branch}"));
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any call mutated the working copy or the remote
    pub fn has_mutating_calls(&self) -> bool {
        self.calls().iter().any(|c| {
            matches!(
                c,
                GitCall::Checkout(_)
                    | GitCall::Pull(..)
                    | GitCall::CreateBranch(_)
                    | GitCall::Push(..)
                    | GitCall::StageAll
                    | GitCall::Commit(_)
            )
        })
    }

    fn record(&self, call: GitCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Workspace for MockWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.record(GitCall::Fetch(remote.to_string()));
        Ok(())
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        self.record(GitCall::RemoteBranches);
        Ok(self.remote_branches.lock().unwrap().clone())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(GitCall::Checkout(branch.to_string()));
        *self.current_branch.lock().unwrap() = branch.to_string();
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(GitCall::Pull(remote.to_string(), branch.to_string()));
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record(GitCall::CreateBranch(branch.to_string()));
        *self.current_branch.lock().unwrap() = branch.to_string();
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(GitCall::Push(remote.to_string(), branch.to_string()));
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record(GitCall::StageAll);
        *self.staged.lock().unwrap() = true;
        Ok(())
    }

    fn is_dirty(&self) -> Result<bool> {
        self.record(GitCall::IsDirty);
        Ok(*self.staged.lock().unwrap())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(GitCall::Commit(message.to_string()));
        *self.staged.lock().unwrap() = false;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.record(GitCall::CurrentBranch);
        Ok(self.current_branch.lock().unwrap().clone())
    }
}

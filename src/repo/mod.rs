//! Local manifest repository operations
//!
//! The publisher drives git through [`Workspace`]; [`GitWorkspace`] shells
//! out to the `git` binary in the manifest checkout.

use crate::config::CommitIdentity;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Remote the manifest checkout pushes to
pub const REMOTE: &str = "origin";

/// git operations needed to publish manifest changes
pub trait Workspace: Send + Sync {
    /// Root of the working copy
    fn root(&self) -> &Path;

    /// Fetch all branches from a remote
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Remote-tracking branch names (`origin/<branch>`)
    fn remote_branches(&self) -> Result<Vec<String>>;

    /// Check out an existing branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Pull a branch from a remote into the current branch
    fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create a branch at HEAD and check it out
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Push a branch to a remote
    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Stage every change, including deletions
    fn stage_all(&self) -> Result<()>;

    /// Whether tracked files differ from HEAD (staged or not)
    fn is_dirty(&self) -> Result<bool>;

    /// Commit the staged changes
    fn commit(&self, message: &str) -> Result<()>;

    /// Name of the checked-out branch
    fn current_branch(&self) -> Result<String>;
}

/// Whether `branch` exists on `remote` according to a remote branch listing
pub fn remote_has_branch(remote_branches: &[String], remote: &str, branch: &str) -> bool {
    let wanted = format!("{remote}/{branch}");
    remote_branches.iter().any(|b| *b == wanted)
}

/// A git working copy driven through the `git` CLI
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    root: PathBuf,
    identity: Option<CommitIdentity>,
}

impl GitWorkspace {
    /// Open a working copy at `root`
    pub fn open(root: &Path, identity: Option<CommitIdentity>) -> Result<Self> {
        if !root.join(".git").exists() {
            return Err(Error::Config(format!(
                "{} is not a git working copy",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            identity,
        })
    }

    /// A git command rooted in the working copy, never prompting for input
    fn git_command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        if let Some(identity) = &self.identity {
            cmd.arg("-c");
            cmd.arg(format!("user.name={}", identity.name));
            cmd.arg("-c");
            cmd.arg(format!("user.email={}", identity.email));
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, "running git");
        let output = self.git_command().args(args).output()?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(Error::Git {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn run_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Workspace for GitWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", remote]).map(drop)
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        let listing = self.run_stdout(&["branch", "-r", "--format=%(refname:short)"])?;
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(drop)
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["pull", remote, branch]).map(drop)
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).map(drop)
    }

    fn stage_all(&self) -> Result<()> {
        self.run(&["add", "--all"]).map(drop)
    }

    fn is_dirty(&self) -> Result<bool> {
        let status = self.run_stdout(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(!status.is_empty())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    fn current_branch(&self) -> Result<String> {
        self.run_stdout(&["rev-parse", "--abbrev-ref", "HEAD"])
    }
}

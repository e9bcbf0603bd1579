//! Manifest command - propagate merged revisions into the manifest repo

use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use bhc_workflow::auth::get_github_auth;
use bhc_workflow::config::Settings;
use bhc_workflow::error::Result;
use bhc_workflow::platform::GitHubService;
use bhc_workflow::publish::{ManifestSyncConfig, SyncOrigin, SyncOutcome, run_manifest_sync};
use bhc_workflow::repo::GitWorkspace;
use bhc_workflow::types::RepoName;
use std::path::PathBuf;
use std::process::ExitCode;

/// Inputs of the manifest command
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    /// Token from the command line or environment
    pub token: Option<String>,
    /// Local clone of the manifest repository
    pub manifest_path: PathBuf,
    /// Triggering PR or issue
    pub origin: SyncOrigin,
    /// Manifest repository name, with or without the owner
    pub manifest_repo: String,
    /// Originating repository (`owner/name`)
    pub origin_repo: RepoName,
    /// Organization the PRs live under
    pub org: String,
}

impl ManifestOptions {
    /// Manifest repository, qualified with the organization when bare
    fn manifest_repo(&self) -> Result<RepoName> {
        if self.manifest_repo.contains('/') {
            self.manifest_repo.parse()
        } else {
            Ok(RepoName::new(self.org.clone(), self.manifest_repo.clone()))
        }
    }
}

/// Run the manifest command
pub async fn run_manifest(options: ManifestOptions, settings: &Settings) -> Result<ExitCode> {
    let auth = get_github_auth(options.token.as_deref()).await?;
    let platform = GitHubService::new(&auth.token, &settings.graphql_url, &settings.api_url)?;
    let workspace = GitWorkspace::open(&options.manifest_path, settings.commit_identity.clone())?;

    let config = ManifestSyncConfig {
        manifest_repo: options.manifest_repo()?,
        origin_repo: options.origin_repo.clone(),
        owner: options.org.clone(),
        origin: options.origin,
    };

    let outcome = run_manifest_sync(&config, settings, &platform, &workspace).await?;
    Ok(report_outcome(&outcome))
}

fn report_outcome(outcome: &SyncOutcome) -> ExitCode {
    print_outcome(outcome);
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::NothingToDo => {
            println!("{}", "No merged PRs to propagate".muted());
        }
        SyncOutcome::BranchExists { branch } => {
            println!(
                "{} {} {}",
                "Branch".muted(),
                branch.accent(),
                "already exists remotely, stopping".muted()
            );
        }
        SyncOutcome::NoChanges { branch } => {
            println!(
                "{} {}",
                "No manifest changes on".muted(),
                branch.accent()
            );
        }
        SyncOutcome::Published {
            branch,
            changed_files,
            pr,
        } => {
            println!(
                "{} {} {}",
                format!("{CHECK} Pushed").success(),
                branch.accent(),
                format!("({} manifest file(s))", changed_files.len()).muted()
            );
            match pr {
                Some(pr) => println!("  {} {}", "PR:".emphasis(), pr.html_url.accent()),
                None => println!("  {}", "PR could not be created".error()),
            }
        }
    }
}

//! Merge command - gate and merge every PR linked to an issue

use crate::cli::style::{CHECK, CROSS, Stylize};
use anstream::println;
use bhc_workflow::auth::get_github_auth;
use bhc_workflow::config::Settings;
use bhc_workflow::error::Result;
use bhc_workflow::gate::{GateDecision, GateReport, MergeGateConfig, run_merge_gate};
use bhc_workflow::platform::GitHubService;
use bhc_workflow::types::RepoName;
use std::process::ExitCode;

/// Inputs of the merge command
#[derive(Debug, Clone)]
pub struct GateOptions {
    /// Token from the command line or environment
    pub token: Option<String>,
    /// Tracking issue number
    pub issue_number: u64,
    /// Repository holding the issue
    pub repo: RepoName,
    /// Report without merging
    pub dry_run: bool,
}

/// Run the merge command
pub async fn run_gate(options: GateOptions, settings: &Settings) -> Result<ExitCode> {
    let auth = get_github_auth(options.token.as_deref()).await?;
    let platform = GitHubService::new(&auth.token, &settings.graphql_url, &settings.api_url)?;

    let config = MergeGateConfig {
        repo: options.repo,
        issue_number: options.issue_number,
        dry_run: options.dry_run,
    };

    let report = run_merge_gate(&config, settings, &platform).await?;
    Ok(print_report(&report, options.dry_run))
}

fn print_report(report: &GateReport, dry_run: bool) -> ExitCode {
    match &report.decision {
        GateDecision::Blocked(blockers) => {
            for blocker in blockers {
                println!("{} {blocker}", CROSS.error());
            }
            println!(
                "{}",
                "Stopping workflow due to one or more pull requests not meeting the criteria."
                    .error()
            );
            ExitCode::FAILURE
        }
        GateDecision::MergeAll(prs) if dry_run => {
            println!("{}:", "Would merge".emphasis());
            for pr in prs {
                println!("  {} #{}", pr.repo.accent(), pr.number);
            }
            ExitCode::SUCCESS
        }
        GateDecision::MergeAll(_) => {
            if report.merges.is_empty() {
                println!("{}", "No linked PRs to merge".muted());
            }
            for outcome in &report.merges {
                if outcome.is_success() {
                    println!("{} {outcome}", CHECK.success());
                } else {
                    println!("{} {outcome}", CROSS.error());
                }
            }
            ExitCode::SUCCESS
        }
    }
}

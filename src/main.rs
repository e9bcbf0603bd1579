//! bhc - manifest propagation and merge gating for linked GitHub PRs

mod cli;

use anstream::eprintln;
use bhc_workflow::config::load_settings;
use bhc_workflow::publish::SyncOrigin;
use bhc_workflow::types::RepoName;
use clap::{Parser, Subcommand};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "bhc", version, about = "Manifest propagation and merge gating for linked PRs")]
struct Cli {
    /// Settings file (TOML); built-in defaults are used when omitted
    #[arg(long, global = true, env = "BHC_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the merge commits linked to a PR into the manifest repo and open a PR
    Manifest {
        /// GitHub token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Local clone of the manifest repository
        #[arg(long, env = "MANIFEST_REPO_PATH")]
        manifest_path: PathBuf,

        /// Merged PR that triggered the run
        #[arg(long, env = "PR_NUMBER")]
        pr: Option<u64>,

        /// Start from a tracking issue instead of a PR (takes precedence over --pr)
        #[arg(long)]
        issue: Option<u64>,

        /// Manifest repository (`name` or `owner/name`)
        #[arg(long, env = "MANIFEST_REPO_NAME")]
        manifest_repo: String,

        /// Repository the PR was merged in (`owner/name`)
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repository: RepoName,

        /// Organization owning the linked PRs
        #[arg(long, env = "GITHUB_ORG")]
        org: String,
    },
    /// Merge every PR linked to an issue once all of them pass the gate
    Merge {
        /// Tracking issue number
        issue_number: u64,

        /// Repository holding the issue (`owner/name`)
        repository: RepoName,

        /// GitHub token
        #[arg(long, env = "RDKCM_RDKE", hide_env_values = true)]
        token: Option<String>,

        /// Evaluate the gate without merging
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "bhc_workflow=debug,bhc=debug"
    } else {
        "bhc_workflow=info,bhc=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> bhc_workflow::error::Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Manifest {
            token,
            manifest_path,
            pr,
            issue,
            manifest_repo,
            repository,
            org,
        } => {
            let origin = match (pr, issue) {
                (_, Some(issue)) => SyncOrigin::Issue(issue),
                (Some(pr), None) => SyncOrigin::PullRequest(pr),
                (None, None) => {
                    return Err(bhc_workflow::error::Error::Config(
                        "PR_NUMBER (or --pr/--issue) is required".to_string(),
                    ));
                }
            };
            cli::run_manifest(
                cli::ManifestOptions {
                    token,
                    manifest_path,
                    origin,
                    manifest_repo,
                    origin_repo: repository,
                    org,
                },
                &settings,
            )
            .await
        }
        Commands::Merge {
            issue_number,
            repository,
            token,
            dry_run,
        } => {
            cli::run_gate(
                cli::GateOptions {
                    token,
                    issue_number,
                    repo: repository,
                    dry_run,
                },
                &settings,
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}

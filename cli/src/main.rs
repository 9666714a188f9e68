//! CLI for portfolio-sync.
//!
//! Regenerates the portfolio's project dataset from GitHub, and maintains
//! the override file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use portfolio_sync::overrides::DEFAULT_OVERRIDES_PATH;
use portfolio_sync::projects::DEFAULT_OUTPUT_PATH;
use portfolio_sync::runner::{DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT};
use portfolio_sync::{
    default_cutoff, hide_stale_projects, DeployMode, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Local env file read before arguments are parsed.
const ENV_FILE: &str = ".env.local";

/// Portfolio Sync - Build the portfolio project dataset from GitHub.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Site root the default data paths are resolved against.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch repositories, merge overrides and contracts, write projects.json.
    Fetch(FetchArgs),

    /// Mark projects last updated before 2020 as hidden in the override file.
    HideStale(HideStaleArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Deployment target; defaults to subpath on GitHub Actions, root otherwise.
    #[arg(long, value_enum)]
    deploy_mode: Option<DeployModeArg>,

    /// Set by GitHub Actions.
    #[arg(long, env = "GITHUB_ACTIONS", hide = true)]
    github_actions: bool,

    /// Override file path (defaults to data/project-overrides.json under the root).
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Output path (defaults to src/data/projects.json under the root).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum repositories enriched concurrently.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// GitHub API base URI.
    #[arg(long, default_value = portfolio_sync::github::DEFAULT_API_BASE)]
    api_base: String,
}

#[derive(Args, Debug)]
struct HideStaleArgs {
    /// Project dataset to scan (defaults to src/data/projects.json under the root).
    #[arg(long)]
    projects: Option<PathBuf>,

    /// Override file to update (defaults to data/project-overrides.json under the root).
    #[arg(long)]
    overrides: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DeployModeArg {
    Root,
    Subpath,
}

impl From<DeployModeArg> for DeployMode {
    fn from(arg: DeployModeArg) -> Self {
        match arg {
            DeployModeArg::Root => DeployMode::Root,
            DeployModeArg::Subpath => DeployMode::Subpath,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // A missing env file is fine; the token may come from the environment.
    dotenvy::from_path(ENV_FILE).ok();

    // Parse arguments
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(args) => match fetch(&cli.root, args).await {
            Ok(summary) => {
                print_summary(&summary);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Critical failure");
                ExitCode::from(1)
            }
        },
        Command::HideStale(args) => {
            let projects = args
                .projects
                .unwrap_or_else(|| cli.root.join(DEFAULT_OUTPUT_PATH));
            let overrides = args
                .overrides
                .unwrap_or_else(|| cli.root.join(DEFAULT_OVERRIDES_PATH));

            match hide_stale_projects(&projects, &overrides, default_cutoff()) {
                Ok(hidden) => {
                    println!("Updated overrides. Marked {hidden} projects as hidden.");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "Failed to update overrides");
                    ExitCode::from(1)
                }
            }
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main fetch logic.
async fn fetch(root: &Path, args: FetchArgs) -> Result<RunSummary, RunnerError> {
    let deploy_mode = args
        .deploy_mode
        .map(DeployMode::from)
        .unwrap_or_else(|| DeployMode::from_github_actions(args.github_actions));
    info!(?deploy_mode, "Starting fetch");

    let mut config = RunnerConfig::new(root, args.token, deploy_mode)
        .with_api_base(args.api_base)
        .with_concurrency(args.concurrency)
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(path) = args.overrides {
        config = config.with_overrides_path(path);
    }
    if let Some(path) = args.output {
        config = config.with_output_path(path);
    }

    Runner::new(config).run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Overrides loaded: {}", summary.overrides_loaded);
    println!("  Repositories fetched: {}", summary.repositories_fetched);
    println!("  Contracts found: {}", summary.contracts_found);
    println!("  Thumbnails mirrored: {}", summary.thumbnails_mirrored);
    if summary.has_degraded() {
        println!("  Thumbnails dropped: {}", summary.thumbnails_failed);
    }
    println!("  Manual entries added: {}", summary.synthetic_projects);
    println!(
        "  Projects saved: {} ({} visible, {} hidden)",
        summary.projects_written,
        summary.visible_projects(),
        summary.hidden_projects
    );
}

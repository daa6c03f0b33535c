use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use redmine_migrate::cmd::config::{self as config_cmd, ConfigArgs};
use redmine_migrate::cmd::issues::{self, ImportOutcome, IssuesArgs};
use redmine_migrate::cmd::labels::{self, LabelsArgs, LabelsOutcome};
use redmine_migrate::config::AppConfig;
use redmine_migrate::context::AppContext;
use redmine_migrate::error::AppResult;
use redmine_migrate::infra::github::GithubClient;
use redmine_migrate::services::TracingObserver;
use redmine_migrate::workflow::publish::PublishSummary;

#[derive(Parser)]
#[command(
    name = "redmine-migrate",
    author,
    version,
    about = "Move Redmine issues and label colors to a GitHub repository"
)]
struct Cli {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, global = true, env = "REDMINE_MIGRATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export or recolor repository labels.
    Labels(LabelsArgs),
    /// Import issues from a Redmine export.
    Issues(IssuesArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

/// Compact single-line events on stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, config_path),
        Commands::Labels(args) => {
            let context = build_context(AppConfig::load(config_path)?)?;
            match labels::run(&context, args.command).await? {
                LabelsOutcome::Saved { count, path } => {
                    println!("Saved {count} labels to {}", path.display())
                }
                LabelsOutcome::Updated { count } => println!("Updated {count} labels"),
            }
            Ok(())
        }
        Commands::Issues(args) => {
            let context = build_context(AppConfig::load(config_path)?)?;
            match issues::run(&context, args.command).await? {
                ImportOutcome::Planned(planned) => {
                    for issue in &planned {
                        println!(
                            "#{} [{}] {} labels={:?} milestone={} assignee={}",
                            issue.id,
                            issue.state.as_str(),
                            issue.title,
                            issue.labels,
                            issue.milestone.as_deref().unwrap_or("-"),
                            issue.assignee.as_deref().unwrap_or("-"),
                        );
                    }
                    println!("\n{} issues would be published.", planned.len());
                }
                ImportOutcome::Published(summary) => print_summary(&summary),
            }
            Ok(())
        }
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let issue_tracker = Arc::new(GithubClient::new(&config.tracker)?);
    Ok(AppContext::new(
        config,
        issue_tracker,
        Arc::new(TracingObserver),
    ))
}

fn print_summary(summary: &PublishSummary) {
    println!("\nSummary:");
    println!("  Labels created: {}", summary.labels_created);
    println!("  Milestones created: {}", summary.milestones_created);
    println!("  Placeholder issues: {}", summary.placeholders_created);
    println!("  Issues created: {}", summary.issues_created);
    println!("  Issues closed: {}", summary.issues_closed);
    println!("  Drift comments: {}", summary.comments_added);
    println!("  Issues unchanged: {}", summary.issues_unchanged);
}

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tracing::info;

use crate::context::AppContext;
use crate::domain::issue::TargetIssue;
use crate::error::AppResult;
use crate::infra::redmine::read_export;
use crate::workflow::mapper::IssueMapper;
use crate::workflow::publish::{PublishSummary, Publisher};

#[derive(Args, Debug, Clone)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub command: IssuesCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum IssuesCommand {
    /// Recreate the issues of a Redmine XML export on GitHub, keeping their numbers.
    Import {
        /// Redmine issue export (issues.xml).
        export: PathBuf,
        /// Map and print the issues without calling GitHub.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug)]
pub enum ImportOutcome {
    Planned(Vec<TargetIssue>),
    Published(PublishSummary),
}

pub async fn run(ctx: &AppContext, command: IssuesCommand) -> AppResult<ImportOutcome> {
    match command {
        IssuesCommand::Import { export, dry_run } => import(ctx, export, dry_run).await,
    }
}

async fn import(ctx: &AppContext, export: PathBuf, dry_run: bool) -> AppResult<ImportOutcome> {
    let sources = read_export(&export)?;
    let mapper = IssueMapper::from_config(&ctx.config.import);
    let issues = mapper.map_all(&sources);
    info!(count = issues.len(), "Processing Redmine issues");

    if dry_run {
        return Ok(ImportOutcome::Planned(issues));
    }

    let publisher = Publisher::new(
        ctx.issue_tracker.clone(),
        ctx.observer.clone(),
        ctx.config.import.placeholder_label.clone(),
    );
    let summary = publisher.publish(&issues).await?;
    Ok(ImportOutcome::Published(summary))
}

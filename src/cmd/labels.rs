use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::labels::{fetch_labels, save_labels, update_labels};

#[derive(Args, Debug, Clone)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LabelsCommand {
    /// Write the repository's labels to a `name: color` file.
    Fetch {
        /// File to write.
        output: PathBuf,
    },
    /// Recolor labels from a `name: color` file.
    Update {
        /// File to read.
        input: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelsOutcome {
    Saved { count: usize, path: PathBuf },
    Updated { count: usize },
}

pub async fn run(ctx: &AppContext, command: LabelsCommand) -> AppResult<LabelsOutcome> {
    match command {
        LabelsCommand::Fetch { output } => {
            let labels = fetch_labels(ctx.issue_tracker.as_ref()).await?;
            save_labels(&labels, &output)?;
            Ok(LabelsOutcome::Saved {
                count: labels.len(),
                path: output,
            })
        }
        LabelsCommand::Update { input } => {
            let count = update_labels(ctx.issue_tracker.as_ref(), &input).await?;
            Ok(LabelsOutcome::Updated { count })
        }
    }
}

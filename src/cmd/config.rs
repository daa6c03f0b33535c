use std::io::{self, Write};
use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{DEFAULT_API_URL, DEFAULT_PLACEHOLDER_LABEL, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand, path: Option<&Path>) -> AppResult<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };
    match command {
        ConfigCommand::Init => run_init(&path),
        ConfigCommand::Show => run_show(&path),
    }
}

fn run_init(path: &Path) -> AppResult<()> {
    let mut cfg = StoredConfig::load_from(path)?;

    println!("Configuring redmine-migrate.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    let github = &mut cfg.github;
    apply_prompt(
        &format!("GitHub API URL (default {DEFAULT_API_URL})"),
        &mut github.api_url,
        false,
    )?;
    apply_prompt("Repository owner", &mut github.owner, false)?;
    apply_prompt("Repository name", &mut github.repo, false)?;
    apply_prompt("GitHub username", &mut github.username, false)?;
    apply_prompt("GitHub token", &mut github.token, true)?;
    apply_prompt(
        &format!("Placeholder label (default {DEFAULT_PLACEHOLDER_LABEL})"),
        &mut cfg.import.placeholder_label,
        false,
    )?;

    cfg.save_to(path)?;

    println!("\nConfiguration saved to {}", path.display());
    println!("Add closed Redmine status ids and user mappings under [import] in that file.");
    Ok(())
}

fn run_show(path: &Path) -> AppResult<()> {
    let cfg = StoredConfig::load_from(path)?;
    let github = &cfg.github;

    println!("Configuration file: {}", path.display());
    println!("GitHub API URL: {}", display_value(&github.api_url));
    println!("Repository owner: {}", display_value(&github.owner));
    println!("Repository name: {}", display_value(&github.repo));
    println!("GitHub username: {}", display_value(&github.username));
    println!("GitHub token: {}", mask_secret(&github.token));
    println!(
        "Placeholder label: {}",
        display_value(&cfg.import.placeholder_label)
    );
    println!(
        "Closed status ids: {}",
        display_list(cfg.import.closed_status_ids.iter().map(u64::to_string))
    );
    println!(
        "User mappings: {}",
        display_list(
            cfg.import
                .users
                .iter()
                .map(|(redmine, github)| format!("{redmine} -> {github}"))
        )
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn display_list(items: impl Iterator<Item = String>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "<not set>".to_string()
    } else {
        joined
    }
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 => {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

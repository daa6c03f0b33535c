use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::config::ImportConfig;
use crate::domain::issue::TargetIssue;
use crate::domain::redmine::SourceIssue;

/// Turns Redmine records into GitHub issues. Pure; never touches the network.
#[derive(Debug, Clone, Default)]
pub struct IssueMapper {
    closed_status_ids: BTreeSet<u64>,
    users: HashMap<u64, String>,
}

impl IssueMapper {
    pub fn new(closed_status_ids: BTreeSet<u64>, users: HashMap<u64, String>) -> Self {
        Self {
            closed_status_ids,
            users,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.closed_status_ids.clone(), config.users.clone())
    }

    pub fn map_all(&self, sources: &[SourceIssue]) -> Vec<TargetIssue> {
        sources.iter().map(|source| self.map(source)).collect()
    }

    pub fn map(&self, source: &SourceIssue) -> TargetIssue {
        let mut issue = TargetIssue::new(source.id, source.subject.clone(), body_for(source));

        if self.closed_status_ids.contains(&source.status.id) {
            issue.close();
        }

        issue.assignee = source.assigned_to.as_ref().and_then(|user| {
            let login = self.users.get(&user.id).cloned();
            if login.is_none() {
                debug!(
                    issue = source.id,
                    redmine_user = user.id,
                    name = %user.name,
                    "No GitHub login mapped, leaving issue unassigned"
                );
            }
            login
        });

        issue.add_label(source.tracker.name.clone());
        issue.add_label(format!("Prio-{}", source.priority.name));
        if let Some(category) = &source.category {
            issue.add_label(category.name.clone());
        }

        issue.milestone = source.fixed_version.as_ref().map(|v| v.name.clone());

        issue
    }
}

/// Description followed by one `__Label:__ value` line per present field.
fn body_for(source: &SourceIssue) -> String {
    let mut body = source.description.clone();
    body.push('\n');

    let done_ratio = source.done_ratio.map(|ratio| ratio.to_string());
    let lines = [
        ("Reporter", source.author.as_ref().map(|r| r.name.as_str())),
        (
            "Assigned to",
            source.assigned_to.as_ref().map(|r| r.name.as_str()),
        ),
        ("Begin", source.start_date.as_deref()),
        ("End", source.due_date.as_deref()),
        ("Completed", done_ratio.as_deref()),
    ];

    for (label, value) in lines {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            body.push_str(&format!("__{label}:__ {value}\n"));
        }
    }
    body
}

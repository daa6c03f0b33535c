//! Reader for Redmine's XML issue export (`/issues.xml` or `/projects/<id>/issues.xml`).

use std::fs;
use std::path::Path;
use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::info;

use crate::domain::redmine::{Reference, SourceIssue};
use crate::error::{AppError, AppResult};

pub fn read_export(path: &Path) -> AppResult<Vec<SourceIssue>> {
    let contents = fs::read_to_string(path)?;
    let issues = parse_export(&contents)?;
    info!(path = %path.display(), count = issues.len(), "Read Redmine issues");
    Ok(issues)
}

pub fn parse_export(xml: &str) -> AppResult<Vec<SourceIssue>> {
    let document = Document::parse(xml)?;
    let root = document.root_element();

    if root.has_tag_name("issue") {
        return Ok(vec![parse_issue(root)?]);
    }

    root.children()
        .filter(|node| node.has_tag_name("issue"))
        .map(parse_issue)
        .collect()
}

fn parse_issue(node: Node<'_, '_>) -> AppResult<SourceIssue> {
    let raw_id = optional_text(node, "id")
        .ok_or_else(|| AppError::MalformedInput("issue without an <id> element".to_string()))?;
    let id = raw_id.parse::<u64>().map_err(|_| {
        AppError::MalformedInput(format!("issue id '{raw_id}' is not a number"))
    })?;

    let subject = optional_text(node, "subject").ok_or_else(|| missing(id, "subject"))?;

    Ok(SourceIssue {
        id,
        subject,
        description: optional_text(node, "description").unwrap_or_default(),
        project: reference(node, id, "project")?,
        tracker: reference(node, id, "tracker")?.ok_or_else(|| missing(id, "tracker"))?,
        status: reference(node, id, "status")?.ok_or_else(|| missing(id, "status"))?,
        priority: reference(node, id, "priority")?.ok_or_else(|| missing(id, "priority"))?,
        author: reference(node, id, "author")?,
        assigned_to: reference(node, id, "assigned_to")?,
        category: reference(node, id, "category")?,
        fixed_version: reference(node, id, "fixed_version")?,
        parent: reference(node, id, "parent")?,
        start_date: optional_text(node, "start_date"),
        due_date: optional_text(node, "due_date"),
        done_ratio: parsed(node, id, "done_ratio")?,
        estimated_hours: parsed(node, id, "estimated_hours")?,
        created_on: optional_text(node, "created_on"),
        updated_on: optional_text(node, "updated_on"),
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(name))
}

/// Concatenated, trimmed text of a child element. Empty text counts as absent.
fn optional_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    let element = child(node, name)?;
    let text = element
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .map(str::trim)
        .collect::<String>();
    if text.is_empty() { None } else { Some(text) }
}

fn parsed<T: FromStr>(node: Node<'_, '_>, issue_id: u64, name: &str) -> AppResult<Option<T>> {
    match optional_text(node, name) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            AppError::MalformedInput(format!(
                "issue #{issue_id}: <{name}> value '{raw}' is not a number"
            ))
        }),
        None => Ok(None),
    }
}

fn reference(node: Node<'_, '_>, issue_id: u64, name: &str) -> AppResult<Option<Reference>> {
    let Some(element) = child(node, name) else {
        return Ok(None);
    };
    let raw_id = element.attribute("id").ok_or_else(|| {
        AppError::MalformedInput(format!("issue #{issue_id}: <{name}> has no id attribute"))
    })?;
    let id = raw_id.trim().parse::<u64>().map_err(|_| {
        AppError::MalformedInput(format!(
            "issue #{issue_id}: <{name}> id '{raw_id}' is not a number"
        ))
    })?;
    Ok(Some(Reference::new(
        id,
        element.attribute("name").unwrap_or_default(),
    )))
}

fn missing(issue_id: u64, field: &str) -> AppError {
    AppError::MalformedInput(format!("issue #{issue_id} has no <{field}> element"))
}

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::label::{Label, LabelColor};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub async fn fetch_labels(tracker: &dyn IssueTrackerService) -> AppResult<Vec<Label>> {
    let labels = tracker.list_labels().await?;
    info!(count = labels.len(), "Fetched labels");
    Ok(labels)
}

pub fn save_labels(labels: &[Label], path: &Path) -> AppResult<()> {
    fs::write(path, format_label_file(labels))?;
    info!(path = %path.display(), count = labels.len(), "Saved labels");
    Ok(())
}

/// Pushes every color in the label file to the tracker. Returns the number of labels updated.
pub async fn update_labels(tracker: &dyn IssueTrackerService, path: &Path) -> AppResult<usize> {
    let contents = fs::read_to_string(path)?;
    let entries = parse_label_file(&contents)?;

    for entry in &entries {
        tracker.update_label(&entry.name, &entry.color).await?;
        info!(label = %entry.name, color = %entry.color, "Updated label");
    }
    Ok(entries.len())
}

pub fn format_label_file(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| format!("{}: {}\n", label.name, label.color))
        .collect()
}

/// Parses `name: color` lines. Blank lines and `#` comments are skipped.
pub fn parse_label_file(contents: &str) -> AppResult<Vec<LabelColor>> {
    let mut entries = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_number = index + 1;

        // Colors never contain ':', names might.
        let (name, color) = line.rsplit_once(':').ok_or_else(|| {
            AppError::MalformedInput(format!("label file line {line_number}: expected 'name: color'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MalformedInput(format!(
                "label file line {line_number}: missing label name"
            )));
        }
        let color = normalize_color(color).ok_or_else(|| {
            AppError::MalformedInput(format!(
                "label file line {line_number}: '{}' is not a six digit hex color",
                color.trim()
            ))
        })?;

        entries.push(LabelColor {
            name: name.to_string(),
            color,
        });
    }
    Ok(entries)
}

fn normalize_color(raw: &str) -> Option<String> {
    let color = raw.trim();
    let color = color.strip_prefix('#').unwrap_or(color);
    if color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(color.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryTracker;

    #[test]
    fn parses_entries_and_skips_comments() {
        let contents = "# exported labels\n\nBug: D73A4A\n  Prio-High : #00ff00  \nscope: api: 0052cc\n";
        let entries = parse_label_file(contents).unwrap();
        assert_eq!(
            entries,
            vec![
                LabelColor {
                    name: "Bug".to_string(),
                    color: "d73a4a".to_string()
                },
                LabelColor {
                    name: "Prio-High".to_string(),
                    color: "00ff00".to_string()
                },
                LabelColor {
                    name: "scope: api".to_string(),
                    color: "0052cc".to_string()
                },
            ]
        );
    }

    #[test]
    fn rejects_line_without_separator() {
        let err = parse_label_file("Bug: d73a4a\nwontfix ffffff\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(msg) if msg.contains("line 2")));
    }

    #[test]
    fn rejects_invalid_color() {
        assert!(matches!(
            parse_label_file("Bug: red\n"),
            Err(AppError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_label_file(": d73a4a\n"),
            Err(AppError::MalformedInput(_))
        ));
    }

    #[test]
    fn formats_one_line_per_label() {
        let labels = vec![
            Label {
                name: "Bug".to_string(),
                color: "d73a4a".to_string(),
            },
            Label {
                name: "Feature".to_string(),
                color: "a2eeef".to_string(),
            },
        ];
        assert_eq!(format_label_file(&labels), "Bug: d73a4a\nFeature: a2eeef\n");
    }

    #[tokio::test]
    async fn saved_file_updates_to_same_colors() {
        let tracker = InMemoryTracker::new()
            .with_label("Bug", "d73a4a")
            .with_label("Prio-Normal", "ededed")
            .with_label("Needs review", "0e8a16");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");

        let before = fetch_labels(&tracker).await.unwrap();
        save_labels(&before, &path).unwrap();
        let updated = update_labels(&tracker, &path).await.unwrap();

        assert_eq!(updated, 3);
        assert_eq!(tracker.labels(), before);
    }

    #[tokio::test]
    async fn edited_file_recolors_labels() {
        let tracker = InMemoryTracker::new()
            .with_label("Bug", "d73a4a")
            .with_label("Feature", "a2eeef");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new-labels.txt");
        fs::write(&path, "# only recolor bugs\nBug: FF0000\n").unwrap();

        update_labels(&tracker, &path).await.unwrap();

        let labels = tracker.labels();
        assert_eq!(labels[0].color, "ff0000");
        assert_eq!(labels[1].color, "a2eeef");
    }

    #[tokio::test]
    async fn unknown_label_aborts_update() {
        let tracker = InMemoryTracker::new().with_label("Bug", "d73a4a");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        fs::write(&path, "Missing: 000000\nBug: ffffff\n").unwrap();

        assert!(update_labels(&tracker, &path).await.is_err());
        assert_eq!(tracker.labels()[0].color, "d73a4a");
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::issue::{NewIssue, RemoteIssue, TargetIssue};
use crate::domain::milestone::{Milestone, MilestoneState};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, PublishEvent, PublishObserver};

/// What one publish run changed on the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub labels_created: usize,
    pub milestones_created: usize,
    pub placeholders_created: usize,
    pub issues_created: usize,
    pub issues_closed: usize,
    pub comments_added: usize,
    pub issues_unchanged: usize,
}

impl PublishSummary {
    fn record(&mut self, event: &PublishEvent) {
        match event {
            PublishEvent::LabelCreated { .. } => self.labels_created += 1,
            PublishEvent::MilestoneCreated { .. } => self.milestones_created += 1,
            PublishEvent::PlaceholderCreated { .. } => self.placeholders_created += 1,
            PublishEvent::IssueCreated { .. } => self.issues_created += 1,
            PublishEvent::IssueClosed { .. } => self.issues_closed += 1,
            PublishEvent::DriftCommented { .. } => self.comments_added += 1,
            PublishEvent::IssueUnchanged { .. } => self.issues_unchanged += 1,
            PublishEvent::MilestonesLoaded { .. }
            | PublishEvent::LabelExists { .. }
            | PublishEvent::SlotOccupied { .. } => {}
        }
    }

    /// Total number of objects created on the tracker, placeholders included.
    pub fn creations(&self) -> usize {
        self.labels_created
            + self.milestones_created
            + self.placeholders_created
            + self.issues_created
            + self.comments_added
    }
}

/// Reconciles mapped issues against the tracker so that GitHub issue numbers
/// end up equal to the Redmine ids.
///
/// Every write is preceded by an existence check, so re-running over the same
/// export only annotates issues whose body drifted.
pub struct Publisher {
    tracker: Arc<dyn IssueTrackerService>,
    observer: Arc<dyn PublishObserver>,
    placeholder_label: String,
    milestones: HashMap<String, Milestone>,
    summary: PublishSummary,
}

impl Publisher {
    pub fn new(
        tracker: Arc<dyn IssueTrackerService>,
        observer: Arc<dyn PublishObserver>,
        placeholder_label: impl Into<String>,
    ) -> Self {
        Self {
            tracker,
            observer,
            placeholder_label: placeholder_label.into(),
            milestones: HashMap::new(),
            summary: PublishSummary::default(),
        }
    }

    pub async fn publish(mut self, issues: &[TargetIssue]) -> AppResult<PublishSummary> {
        self.load_milestones().await?;
        self.ensure_labels(issues).await?;

        let mut ordered: Vec<&TargetIssue> = issues.iter().collect();
        ordered.sort_by_key(|issue| issue.id);

        let mut cursor = 1;
        for issue in ordered {
            while cursor < issue.id {
                self.fill_slot(cursor).await?;
                cursor += 1;
            }
            let milestone = self.resolve_milestone(issue.milestone.as_deref()).await?;
            self.reconcile(issue, milestone).await?;
            cursor = cursor.max(issue.id + 1);
        }

        Ok(self.summary)
    }

    fn emit(&mut self, event: PublishEvent) {
        self.summary.record(&event);
        self.observer.on_event(&event);
    }

    async fn load_milestones(&mut self) -> AppResult<()> {
        for state in [MilestoneState::Open, MilestoneState::Closed] {
            for milestone in self.tracker.list_milestones(state).await? {
                self.milestones.insert(milestone.title.clone(), milestone);
            }
        }
        let count = self.milestones.len();
        self.emit(PublishEvent::MilestonesLoaded { count });
        Ok(())
    }

    async fn ensure_labels(&mut self, issues: &[TargetIssue]) -> AppResult<()> {
        let mut names: Vec<String> = Vec::new();
        let referenced = issues
            .iter()
            .flat_map(|issue| issue.labels.iter())
            .chain(std::iter::once(&self.placeholder_label));
        for name in referenced {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        for name in names {
            if self.tracker.get_label(&name).await?.is_some() {
                self.emit(PublishEvent::LabelExists { name });
            } else {
                self.tracker.create_label(&name).await?;
                self.emit(PublishEvent::LabelCreated { name });
            }
        }
        Ok(())
    }

    /// Occupies `number` with a closed placeholder unless something already lives there.
    async fn fill_slot(&mut self, number: u64) -> AppResult<()> {
        if self.tracker.get_issue(number).await?.is_some() {
            self.emit(PublishEvent::SlotOccupied { number });
            return Ok(());
        }

        let placeholder = NewIssue {
            title: format!("Dummy ticket {number}"),
            labels: vec![self.placeholder_label.clone()],
            ..NewIssue::default()
        };
        let created = self.tracker.create_issue(placeholder).await?;
        expect_number(number, &created)?;
        self.tracker.close_issue(created.number).await?;
        self.emit(PublishEvent::PlaceholderCreated { number });
        Ok(())
    }

    async fn resolve_milestone(&mut self, title: Option<&str>) -> AppResult<Option<u64>> {
        let Some(title) = title else {
            return Ok(None);
        };
        if let Some(milestone) = self.milestones.get(title) {
            return Ok(Some(milestone.number));
        }

        let created = self.tracker.create_milestone(title).await?;
        let number = created.number;
        self.milestones.insert(title.to_string(), created);
        self.emit(PublishEvent::MilestoneCreated {
            title: title.to_string(),
            number,
        });
        Ok(Some(number))
    }

    async fn reconcile(&mut self, issue: &TargetIssue, milestone: Option<u64>) -> AppResult<()> {
        let number = issue.id;
        match self.tracker.get_issue(number).await? {
            Some(existing) if existing.body_text() == issue.body => {
                self.emit(PublishEvent::IssueUnchanged { number });
            }
            Some(_) => {
                self.tracker
                    .create_comment(number, &issue.drift_comment())
                    .await?;
                self.emit(PublishEvent::DriftCommented { number });
            }
            None => {
                let payload = NewIssue {
                    title: issue.title.clone(),
                    body: Some(issue.body.clone()).filter(|body| !body.is_empty()),
                    assignee: issue.assignee.clone(),
                    milestone,
                    labels: issue.labels.clone(),
                };
                let created = self.tracker.create_issue(payload).await?;
                expect_number(number, &created)?;
                self.emit(PublishEvent::IssueCreated {
                    number,
                    title: issue.title.clone(),
                });

                if issue.is_closed() {
                    self.tracker.close_issue(number).await?;
                    self.emit(PublishEvent::IssueClosed { number });
                }
            }
        }
        Ok(())
    }
}

fn expect_number(expected: u64, created: &RemoteIssue) -> AppResult<()> {
    if created.number == expected {
        Ok(())
    } else {
        Err(AppError::Numbering {
            expected,
            actual: created.number,
        })
    }
}

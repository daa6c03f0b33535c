//! In-memory [`IssueTrackerService`] that numbers issues the way GitHub does.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::issue::{IssueState, NewIssue, RemoteIssue};
use crate::domain::label::Label;
use crate::domain::milestone::{Milestone, MilestoneState};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const DEFAULT_COLOR: &str = "ededed";

#[derive(Debug, Clone)]
pub struct StoredIssue {
    pub remote: RemoteIssue,
    pub labels: Vec<String>,
    pub milestone: Option<u64>,
    pub assignee: Option<String>,
}

#[derive(Default)]
struct TrackerState {
    labels: Vec<Label>,
    milestones: Vec<(Milestone, MilestoneState)>,
    issues: BTreeMap<u64, StoredIssue>,
    comments: Vec<(u64, String)>,
    mutations: usize,
    reject_title: Option<String>,
}

#[derive(Default)]
pub struct InMemoryTracker {
    state: Mutex<TrackerState>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_label(self, name: &str, color: &str) -> Self {
        self.lock().labels.push(Label {
            name: name.to_string(),
            color: color.to_string(),
        });
        self
    }

    pub fn with_milestone(self, title: &str, state: MilestoneState) -> Self {
        {
            let mut inner = self.lock();
            let number = inner.milestones.len() as u64 + 1;
            inner.milestones.push((
                Milestone {
                    number,
                    title: title.to_string(),
                },
                state,
            ));
        }
        self
    }

    /// Seeds an issue at a fixed number, as if it was created before the run.
    pub fn with_issue(self, number: u64, title: &str, body: &str) -> Self {
        self.lock().issues.insert(
            number,
            StoredIssue {
                remote: RemoteIssue {
                    number,
                    title: title.to_string(),
                    body: Some(body.to_string()),
                    state: IssueState::Open,
                },
                labels: Vec::new(),
                milestone: None,
                assignee: None,
            },
        );
        self
    }

    /// Makes `create_issue` fail with a 422 for the given title.
    pub fn rejecting_title(self, title: &str) -> Self {
        self.lock().reject_title = Some(title.to_string());
        self
    }

    pub fn issue(&self, number: u64) -> Option<StoredIssue> {
        self.lock().issues.get(&number).cloned()
    }

    pub fn issue_numbers(&self) -> Vec<u64> {
        self.lock().issues.keys().copied().collect()
    }

    pub fn label_names(&self) -> Vec<String> {
        self.lock().labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.lock().labels.clone()
    }

    pub fn milestone_titles(&self) -> Vec<String> {
        self.lock()
            .milestones
            .iter()
            .map(|(m, _)| m.title.clone())
            .collect()
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.lock().comments.clone()
    }

    /// Number of write calls served so far.
    pub fn mutations(&self) -> usize {
        self.lock().mutations
    }
}

fn not_found(what: &str) -> AppError {
    AppError::Api {
        status: StatusCode::NOT_FOUND,
        body: format!("{what} not found"),
    }
}

#[async_trait]
impl IssueTrackerService for InMemoryTracker {
    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        Ok(self.lock().labels.clone())
    }

    async fn get_label(&self, name: &str) -> AppResult<Option<Label>> {
        Ok(self.lock().labels.iter().find(|l| l.name == name).cloned())
    }

    async fn create_label(&self, name: &str) -> AppResult<Label> {
        let mut inner = self.lock();
        if inner.labels.iter().any(|l| l.name == name) {
            return Err(AppError::Api {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: format!("label {name} already_exists"),
            });
        }
        let label = Label {
            name: name.to_string(),
            color: DEFAULT_COLOR.to_string(),
        };
        inner.labels.push(label.clone());
        inner.mutations += 1;
        Ok(label)
    }

    async fn update_label(&self, name: &str, color: &str) -> AppResult<Label> {
        let mut inner = self.lock();
        inner.mutations += 1;
        let label = inner
            .labels
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| not_found(name))?;
        label.color = color.to_string();
        Ok(label.clone())
    }

    async fn list_milestones(&self, state: MilestoneState) -> AppResult<Vec<Milestone>> {
        Ok(self
            .lock()
            .milestones
            .iter()
            .filter(|(_, s)| *s == state)
            .map(|(m, _)| m.clone())
            .collect())
    }

    async fn create_milestone(&self, title: &str) -> AppResult<Milestone> {
        let mut inner = self.lock();
        let milestone = Milestone {
            number: inner.milestones.len() as u64 + 1,
            title: title.to_string(),
        };
        inner
            .milestones
            .push((milestone.clone(), MilestoneState::Open));
        inner.mutations += 1;
        Ok(milestone)
    }

    async fn get_issue(&self, number: u64) -> AppResult<Option<RemoteIssue>> {
        Ok(self.lock().issues.get(&number).map(|i| i.remote.clone()))
    }

    async fn create_issue(&self, issue: NewIssue) -> AppResult<RemoteIssue> {
        let mut inner = self.lock();
        if inner.reject_title.as_deref() == Some(issue.title.as_str()) {
            return Err(AppError::Api {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: format!("rejected issue '{}'", issue.title),
            });
        }
        let number = inner.issues.keys().next_back().map_or(1, |last| last + 1);
        let remote = RemoteIssue {
            number,
            title: issue.title,
            body: issue.body,
            state: IssueState::Open,
        };
        inner.issues.insert(
            number,
            StoredIssue {
                remote: remote.clone(),
                labels: issue.labels,
                milestone: issue.milestone,
                assignee: issue.assignee,
            },
        );
        inner.mutations += 1;
        Ok(remote)
    }

    async fn close_issue(&self, number: u64) -> AppResult<RemoteIssue> {
        let mut inner = self.lock();
        inner.mutations += 1;
        let stored = inner
            .issues
            .get_mut(&number)
            .ok_or_else(|| not_found("issue"))?;
        stored.remote.state = IssueState::Closed;
        Ok(stored.remote.clone())
    }

    async fn create_comment(&self, number: u64, body: &str) -> AppResult<()> {
        let mut inner = self.lock();
        if !inner.issues.contains_key(&number) {
            return Err(not_found("issue"));
        }
        inner.comments.push((number, body.to_string()));
        inner.mutations += 1;
        Ok(())
    }
}

use async_trait::async_trait;

use crate::domain::issue::{NewIssue, RemoteIssue};
use crate::domain::label::Label;
use crate::domain::milestone::{Milestone, MilestoneState};
use crate::error::AppResult;

/// The remote issue tracker. Lookups return `None` when the tracker reports not-found.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn list_labels(&self) -> AppResult<Vec<Label>>;
    async fn get_label(&self, name: &str) -> AppResult<Option<Label>>;
    async fn create_label(&self, name: &str) -> AppResult<Label>;
    async fn update_label(&self, name: &str, color: &str) -> AppResult<Label>;

    async fn list_milestones(&self, state: MilestoneState) -> AppResult<Vec<Milestone>>;
    async fn create_milestone(&self, title: &str) -> AppResult<Milestone>;

    async fn get_issue(&self, number: u64) -> AppResult<Option<RemoteIssue>>;
    async fn create_issue(&self, issue: NewIssue) -> AppResult<RemoteIssue>;
    async fn close_issue(&self, number: u64) -> AppResult<RemoteIssue>;
    async fn create_comment(&self, number: u64, body: &str) -> AppResult<()>;
}

use tracing::{debug, info};

/// Something a publish run did, or deliberately left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishEvent {
    MilestonesLoaded { count: usize },
    LabelCreated { name: String },
    LabelExists { name: String },
    MilestoneCreated { title: String, number: u64 },
    PlaceholderCreated { number: u64 },
    SlotOccupied { number: u64 },
    IssueCreated { number: u64, title: String },
    IssueClosed { number: u64 },
    IssueUnchanged { number: u64 },
    DriftCommented { number: u64 },
}

pub trait PublishObserver: Send + Sync {
    fn on_event(&self, event: &PublishEvent);
}

/// Reports publish progress as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PublishObserver for TracingObserver {
    fn on_event(&self, event: &PublishEvent) {
        match event {
            PublishEvent::MilestonesLoaded { count } => {
                info!(count, "Loaded existing milestones")
            }
            PublishEvent::LabelCreated { name } => info!(label = %name, "Created label"),
            PublishEvent::LabelExists { name } => debug!(label = %name, "Label already exists"),
            PublishEvent::MilestoneCreated { title, number } => {
                info!(milestone = %title, number, "Created milestone")
            }
            PublishEvent::PlaceholderCreated { number } => {
                info!(number, "Created placeholder issue")
            }
            PublishEvent::SlotOccupied { number } => {
                debug!(number, "Issue number already taken, no placeholder needed")
            }
            PublishEvent::IssueCreated { number, title } => {
                info!(number, title = %title, "Created issue")
            }
            PublishEvent::IssueClosed { number } => info!(number, "Closed issue"),
            PublishEvent::IssueUnchanged { number } => {
                info!(number, "Issue already exists and is up to date")
            }
            PublishEvent::DriftCommented { number } => {
                info!(number, "Issue already exists with a different body, added comment")
            }
        }
    }
}

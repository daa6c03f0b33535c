pub mod issue_tracker;
pub mod observer;

pub use issue_tracker::IssueTrackerService;
pub use observer::{PublishEvent, PublishObserver, TracingObserver};

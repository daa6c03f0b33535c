use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, PublishObserver};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub observer: Arc<dyn PublishObserver>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        observer: Arc<dyn PublishObserver>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            observer,
        }
    }
}

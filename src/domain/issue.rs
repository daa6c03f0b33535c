use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// A GitHub issue derived from a Redmine record, numbered like its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIssue {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
    pub assignee: Option<String>,
}

impl TargetIssue {
    pub fn new(id: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            state: IssueState::Open,
            labels: Vec::new(),
            milestone: None,
            assignee: None,
        }
    }

    pub fn close(&mut self) {
        self.state = IssueState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// Appends a label unless it is already present.
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    /// Text posted when an existing GitHub issue has drifted from the export.
    pub fn drift_comment(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// Payload for creating an issue on the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// An issue as the tracker reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
}

impl RemoteIssue {
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

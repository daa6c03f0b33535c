/// An `id`/`name` pair as Redmine nests it for projects, trackers, users and versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: u64,
    pub name: String,
}

impl Reference {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One `<issue>` record of a Redmine export.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceIssue {
    pub id: u64,
    pub subject: String,
    pub description: String,
    pub project: Option<Reference>,
    pub tracker: Reference,
    pub status: Reference,
    pub priority: Reference,
    pub author: Option<Reference>,
    pub assigned_to: Option<Reference>,
    pub category: Option<Reference>,
    pub fixed_version: Option<Reference>,
    pub parent: Option<Reference>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub done_ratio: Option<u8>,
    pub estimated_hours: Option<f64>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
}

impl SourceIssue {
    /// Minimal record with every optional field unset.
    pub fn new(
        id: u64,
        subject: impl Into<String>,
        tracker: Reference,
        status: Reference,
        priority: Reference,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            description: String::new(),
            project: None,
            tracker,
            status,
            priority,
            author: None,
            assigned_to: None,
            category: None,
            fixed_version: None,
            parent: None,
            start_date: None,
            due_date: None,
            done_ratio: None,
            estimated_hours: None,
            created_on: None,
            updated_on: None,
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

/// One `name: color` entry of a label file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelColor {
    pub name: String,
    pub color: String,
}

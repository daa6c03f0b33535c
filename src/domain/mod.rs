pub mod issue;
pub mod label;
pub mod milestone;
pub mod redmine;

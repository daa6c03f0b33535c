//! Moves a Redmine project to GitHub: label colors, and issues with their original numbers.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod workflow;

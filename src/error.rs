use std::io;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("GitHub responded with {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("failed to call GitHub: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid XML export: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("expected GitHub to assign issue #{expected}, got #{actual}")]
    Numbering { expected: u64, actual: u64 },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

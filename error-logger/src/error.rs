use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("File logging enabled without a file path")]
    MissingFilePath,

    #[error("Failed to open log file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid level filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    SubscriberInit(String),
}

pub type Result<T> = std::result::Result<T, LoggerError>;

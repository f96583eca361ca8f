use error_logger::LoggerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("Configuration load failed: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Logger initialization failed: {0}")]
    Logger(#[from] LoggerError),

    #[error("Error framework not initialized")]
    NotInitialized,

    #[error("{0} adapter is not enabled")]
    AdapterDisabled(&'static str),
}

pub type Result<T> = std::result::Result<T, FrameworkError>;

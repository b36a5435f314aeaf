//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error while writing to a sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A level name that does not match any known level
    #[error("unknown log level: '{0}'")]
    UnknownLevel(String),
}

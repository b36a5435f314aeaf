//! Core logger types and traits

pub mod error;
pub mod error_info;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod log_value;
pub mod logger;
pub mod template;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use error_info::{ErrorInfo, LoggedError};
pub use log_context::{Context, FIELD_CORR, FIELD_OP, FIELD_TRANS};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use log_value::{Call, LogValue, Message};
pub use logger::{root, ContextGetter, Logger, LoggerBuilder, ENV_FORMAT, ENV_LEVEL, ENV_MODE};

//! Normalized log record
//!
//! The dispatcher classifies every call into one of these before any
//! formatting runs. A record lives for exactly one call: it is built,
//! handed to the active formatter, written, and dropped.

use chrono::{DateTime, Utc};

use super::error_info::LoggedError;
use super::log_context::Context;
use super::log_level::LogLevel;
use super::log_value::{LogValue, Message};

#[derive(Debug)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Fully merged context: context getter, stored context, per-call
    /// context, later layers winning ties
    pub context: Context,
    /// The per-call context alone; the dev format dumps only this
    pub local_context: Option<Context>,
    pub message: Message,
    pub args: Vec<LogValue>,
    /// Error accompanying a text message (error-first calls)
    pub err: Option<LoggedError>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: Message) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            context: Context::new(),
            local_context: None,
            message,
            args: Vec::new(),
            err: None,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_local_context(mut self, context: Option<Context>) -> Self {
        self.local_context = context;
        self
    }

    pub fn with_args(mut self, args: Vec<LogValue>) -> Self {
        self.args = args;
        self
    }

    pub fn with_err(mut self, err: Option<LoggedError>) -> Self {
        self.err = err;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

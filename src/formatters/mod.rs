//! Trace formatters
//!
//! A [`Formatter`] turns one normalized [`LogRecord`] into one output
//! line. Three built-ins live in the [`Formatters`] registry:
//!
//! - `json`: single-line JSON objects for machine consumption
//! - `dev`: colorized human-readable traces for development
//! - `pipe`: the legacy pipe-delimited operations format
//!
//! The registry also owns the option sets that are read at format time:
//! the set of levels that print full stack traces (shared by `json` and
//! `dev`) and the pipe format's not-available placeholder.

pub mod dev;
pub mod json;
pub mod pipe;

use parking_lot::RwLock;
use std::sync::Arc;

use crate::core::log_level::LogLevel;
use crate::core::log_record::LogRecord;
use crate::core::log_value::{LogValue, Message};
use crate::core::template::{self, ErrStyle};

pub use dev::DevFormatter;
pub use json::JsonFormatter;
pub use pipe::PipeFormatter;

/// Converts a normalized log record into an output line
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
    fn name(&self) -> &'static str;
}

/// A shareable formatter reference. Identity comparison via
/// [`Arc::ptr_eq`] tells callers which formatter is active.
pub type FormatRef = Arc<dyn Formatter>;

/// Levels that render full stack traces, shared by `json` and `dev`
pub type StacktraceLevels = Arc<RwLock<Vec<LogLevel>>>;

/// The built-in formatter registry
pub struct Formatters {
    pub json: Arc<JsonFormatter>,
    pub dev: Arc<DevFormatter>,
    pub pipe: Arc<PipeFormatter>,
    stacktraces_with: StacktraceLevels,
    not_available: Arc<RwLock<String>>,
}

impl Formatters {
    pub fn new() -> Self {
        let stacktraces_with: StacktraceLevels =
            Arc::new(RwLock::new(vec![LogLevel::Error, LogLevel::Fatal]));
        let not_available = Arc::new(RwLock::new("n/a".to_string()));

        Self {
            json: Arc::new(JsonFormatter::new(Arc::clone(&stacktraces_with))),
            dev: Arc::new(DevFormatter::new(Arc::clone(&stacktraces_with))),
            pipe: Arc::new(PipeFormatter::new(Arc::clone(&not_available))),
            stacktraces_with,
            not_available,
        }
    }

    /// Look up a built-in formatter by name. Names are case-sensitive.
    pub fn by_name(&self, name: &str) -> Option<FormatRef> {
        match name {
            "json" => Some(Arc::clone(&self.json) as FormatRef),
            "dev" => Some(Arc::clone(&self.dev) as FormatRef),
            "pipe" => Some(Arc::clone(&self.pipe) as FormatRef),
            _ => None,
        }
    }

    /// The levels that currently render full stack traces
    pub fn stacktraces_with(&self) -> Vec<LogLevel> {
        self.stacktraces_with.read().clone()
    }

    /// Replace the set of levels that render full stack traces.
    /// Takes effect for all subsequent calls immediately.
    pub fn set_stacktraces_with(&self, levels: Vec<LogLevel>) {
        *self.stacktraces_with.write() = levels;
    }

    /// The placeholder the pipe format prints for absent corr/trans/op
    pub fn not_available(&self) -> String {
        self.not_available.read().clone()
    }

    /// Replace the pipe format's not-available placeholder
    pub fn set_not_available<S: Into<String>>(&self, placeholder: S) {
        *self.not_available.write() = placeholder.into();
    }
}

impl Default for Formatters {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the message-plus-args body of a record, console.log-style.
/// Error messages are handled by each formatter; here they render short.
pub(crate) fn render_body(message: &Message, args: &[LogValue], errs: ErrStyle) -> String {
    match message {
        Message::Text(fmt) => template::format_message(fmt, args, errs),
        Message::Error(err) => {
            let mut out = err.short();
            for arg in args {
                out.push(' ');
                out.push_str(&template::to_display_string(arg, errs));
            }
            out
        }
        Message::Other(value) => {
            let mut out = template::value_to_string(value);
            for arg in args {
                out.push(' ');
                out.push_str(&template::to_display_string(arg, errs));
            }
            out
        }
        Message::None => {
            let rendered: Vec<String> = args
                .iter()
                .map(|arg| template::to_display_string(arg, errs))
                .collect();
            rendered.join(" ")
        }
    }
}

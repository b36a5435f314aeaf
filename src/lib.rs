//! # opslog
//!
//! A lightweight structured logger: leveled calls with optional context
//! metadata and printf-style messages, rendered into one of three trace
//! formats and written synchronously to a pluggable sink.
//!
//! ## Features
//!
//! - **Three formats**: single-line JSON, colorized human-readable dev
//!   output, and a legacy pipe-delimited operations format
//! - **Flexible calls**: lead with a format string, a context object,
//!   or an error; everything normalizes to the same trace shape
//! - **Error chains**: `source()` chains serialize as nested causes in
//!   JSON and `Caused by:` blocks in dev output
//! - **Child loggers**: inherit sink, format and context, override any
//!   of them independently
//!
//! ## Example
//!
//! ```
//! use opslog::prelude::*;
//! use opslog::info;
//!
//! let logger = Logger::new();
//! logger.set_format_name("dev");
//!
//! info!(logger, "Server listening on port %d", 8080);
//! info!(logger, Context::new().with_field("corr", "abc-123"), "Request accepted");
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        root, Call, Context, ContextGetter, ErrorInfo, LogLevel, LogRecord, LogValue, LoggedError,
        Logger, LoggerBuilder, LoggerError, Message, Result,
    };
    pub use crate::formatters::{DevFormatter, FormatRef, Formatter, Formatters, JsonFormatter, PipeFormatter};
    pub use crate::sinks::{FileSink, MemorySink, Sink, SinkRef, StderrSink, StdoutSink};
}

pub use crate::core::{
    root, Call, Context, ContextGetter, ErrorInfo, LogLevel, LogRecord, LogValue, LoggedError,
    Logger, LoggerBuilder, LoggerError, Message, Result, ENV_FORMAT, ENV_LEVEL, ENV_MODE,
};
pub use crate::formatters::{FormatRef, Formatter, Formatters};
pub use crate::sinks::{FileSink, MemorySink, Sink, SinkRef, StderrSink, StdoutSink};

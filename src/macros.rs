//! Logging macros for the variadic call surface.
//!
//! The macros mirror the logger's calling conventions: lead with a
//! format string, a context object, or a captured error. Arguments are
//! only evaluated when the level is enabled, so a disabled level costs
//! a threshold comparison and nothing else.
//!
//! # Examples
//!
//! ```
//! use opslog::prelude::*;
//! use opslog::info;
//! use serde_json::json;
//!
//! let logger = Logger::new();
//!
//! // Message with printf-style placeholders
//! info!(logger, "Request %s %d %j", "is", 5, json!({"key": "value"}));
//!
//! // Context-first call
//! info!(logger, json!({"corr": "abc"}), "Startup");
//! ```

/// Log at an explicit level.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// use opslog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.enabled($level) {
            logger.log($level, vec![$($crate::LogValue::from($arg)),*]);
        }
    }};
}

/// Log a debug-level trace.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_level(LogLevel::Debug);
/// use opslog::debug;
/// debug!(logger, "Cache miss for %s", "user:42");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Debug $(, $arg)*)
    };
}

/// Log an info-level trace.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// use opslog::info;
/// info!(logger, "Processing %d items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Info $(, $arg)*)
    };
}

/// Log a warn-level trace.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// use opslog::warn;
/// warn!(logger, "Retry attempt %d of %d", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Warn $(, $arg)*)
    };
}

/// Log an error-level trace.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// use opslog::error;
/// let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// error!(logger, LogValue::error(io_err), "Request failed");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Error $(, $arg)*)
    };
}

/// Log a fatal-level trace.
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new();
/// use opslog::fatal;
/// fatal!(logger, "Unable to recover: %s", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Fatal $(, $arg)*)
    };
}

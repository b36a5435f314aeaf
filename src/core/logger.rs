//! Logger: level filter, call classification and dispatch
//!
//! A [`Logger`] owns its configuration (level threshold, active format,
//! sink, context getter, stored context) and shares a [`Formatters`]
//! registry with its children. Child loggers inherit every setting they
//! have not overridden, so changing the parent's sink or format is
//! visible in children until they set their own.
//!
//! Dispatch normalizes the positional arguments of a call into a
//! [`LogRecord`] (context-first, message-first and error-first calls all
//! reduce to the same shape), formats it with the active formatter and
//! writes the line to the sink. A log call never panics: formatter
//! panics degrade to a fallback line and sink errors are reported on
//! stderr.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use crate::formatters::{FormatRef, Formatters};
use crate::sinks::{SinkRef, StdoutSink};

use super::error_info::LoggedError;
use super::log_context::Context;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::log_value::{Call, LogValue, Message};

/// Environment variable selecting the initial level (case-insensitive)
pub const ENV_LEVEL: &str = "OPSLOG_LEVEL";
/// Environment variable selecting the initial format (case-sensitive:
/// `json`, `dev` or `pipe`)
pub const ENV_FORMAT: &str = "OPSLOG_FORMAT";
/// Environment variable for the ambient mode; `development` defaults
/// the format to `dev` when no format was selected
pub const ENV_MODE: &str = "OPSLOG_ENV";

/// A replaceable zero-argument capability producing the process-wide
/// context layer
pub type ContextGetter = Arc<dyn Fn() -> Context + Send + Sync>;

struct LoggerInner {
    parent: Option<Logger>,
    level: RwLock<Option<LogLevel>>,
    format: RwLock<Option<FormatRef>>,
    sink: RwLock<Option<SinkRef>>,
    context_getter: RwLock<Option<ContextGetter>>,
    /// Stored context, accumulated through the child chain at creation
    context: Context,
    formatters: Arc<Formatters>,
}

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// A logger with pure defaults: INFO, json format, stdout sink,
    /// empty context getter. Environment variables are not consulted.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A logger configured from `OPSLOG_LEVEL`, `OPSLOG_FORMAT` and
    /// `OPSLOG_ENV`, read once here.
    pub fn from_env() -> Self {
        Self::builder().read_env().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    // ----- level -----

    /// The effective minimum level (inherited from the parent until
    /// explicitly set)
    pub fn level(&self) -> LogLevel {
        if let Some(level) = *self.inner.level.read() {
            return level;
        }
        match &self.inner.parent {
            Some(parent) => parent.level(),
            None => LogLevel::default(),
        }
    }

    /// The effective minimum level's name
    pub fn level_name(&self) -> &'static str {
        self.level().to_str()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.inner.level.write() = Some(level);
    }

    /// Set the level by name, case-insensitively. An unknown or empty
    /// name falls back to the default level rather than failing.
    pub fn set_level_name(&self, name: &str) {
        self.set_level(name.parse().unwrap_or_default());
    }

    /// Whether a call at `level` would produce output
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    // ----- format / sink / context -----

    /// The active formatter. Compare with [`Arc::ptr_eq`] against the
    /// registry entries to identify it.
    pub fn format(&self) -> FormatRef {
        if let Some(format) = self.inner.format.read().clone() {
            return format;
        }
        match &self.inner.parent {
            Some(parent) => parent.format(),
            None => Arc::clone(&self.inner.formatters.json) as FormatRef,
        }
    }

    pub fn set_format(&self, format: FormatRef) {
        *self.inner.format.write() = Some(format);
    }

    /// Select a built-in formatter by name. An unknown name falls back
    /// to the default json formatter.
    pub fn set_format_name(&self, name: &str) {
        let format = self
            .inner
            .formatters
            .by_name(name)
            .unwrap_or_else(|| Arc::clone(&self.inner.formatters.json) as FormatRef);
        self.set_format(format);
    }

    pub fn sink(&self) -> SinkRef {
        if let Some(sink) = self.inner.sink.read().clone() {
            return sink;
        }
        match &self.inner.parent {
            Some(parent) => parent.sink(),
            None => Arc::new(StdoutSink::new()),
        }
    }

    pub fn set_sink(&self, sink: SinkRef) {
        *self.inner.sink.write() = Some(sink);
    }

    /// The process-wide context layer for this logger's traces
    pub fn get_context(&self) -> Context {
        self.context_getter()()
    }

    pub fn set_context_getter<F>(&self, getter: F)
    where
        F: Fn() -> Context + Send + Sync + 'static,
    {
        *self.inner.context_getter.write() = Some(Arc::new(getter));
    }

    fn context_getter(&self) -> ContextGetter {
        if let Some(getter) = self.inner.context_getter.read().clone() {
            return getter;
        }
        match &self.inner.parent {
            Some(parent) => parent.context_getter(),
            None => Arc::new(Context::new),
        }
    }

    /// The built-in formatter registry shared along the child chain
    pub fn formatters(&self) -> &Formatters {
        &self.inner.formatters
    }

    // ----- children -----

    /// Create a child logger. The child shares this logger's sink,
    /// format and context getter until it overrides them, appends
    /// `context` to the stored context (child keys win ties), and keeps
    /// an independent level once one is set on it.
    pub fn child<C: Into<Context>>(&self, context: C) -> Logger {
        let mut stored = self.inner.context.clone();
        stored.extend(&context.into());

        Logger {
            inner: Arc::new(LoggerInner {
                parent: Some(self.clone()),
                level: RwLock::new(None),
                format: RwLock::new(None),
                sink: RwLock::new(None),
                context_getter: RwLock::new(None),
                context: stored,
                formatters: Arc::clone(&self.inner.formatters),
            }),
        }
    }

    // ----- dispatch -----

    pub fn log<C: Into<Call>>(&self, level: LogLevel, call: C) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, call.into());
    }

    pub fn debug<C: Into<Call>>(&self, call: C) {
        self.log(LogLevel::Debug, call);
    }

    pub fn info<C: Into<Call>>(&self, call: C) {
        self.log(LogLevel::Info, call);
    }

    pub fn warn<C: Into<Call>>(&self, call: C) {
        self.log(LogLevel::Warn, call);
    }

    pub fn error<C: Into<Call>>(&self, call: C) {
        self.log(LogLevel::Error, call);
    }

    pub fn fatal<C: Into<Call>>(&self, call: C) {
        self.log(LogLevel::Fatal, call);
    }

    fn dispatch(&self, level: LogLevel, call: Call) {
        let classified = classify(call.values);

        let mut context = self.get_context();
        context.extend(&self.inner.context);
        if let Some(local) = &classified.local {
            context.extend(local);
        }

        let record = LogRecord::new(level, classified.message)
            .with_context(context)
            .with_local_context(classified.local)
            .with_args(classified.args)
            .with_err(classified.err);

        let format = self.format();
        let line = panic::catch_unwind(AssertUnwindSafe(|| format.format(&record)))
            .unwrap_or_else(|_| format!("{} trace formatting failed", level.to_str()));

        if let Err(err) = self.sink().write_line(&line) {
            eprintln!("[opslog] failed to write trace: {}", err);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide default logger, configured from the environment on
/// first use. The only global this crate keeps.
pub fn root() -> &'static Logger {
    static ROOT: OnceLock<Logger> = OnceLock::new();
    ROOT.get_or_init(Logger::from_env)
}

struct Classified {
    local: Option<Context>,
    message: Message,
    args: Vec<LogValue>,
    err: Option<LoggedError>,
}

/// Normalize the positional arguments of a call.
///
/// A leading plain object is the per-call context. The next value is
/// the message: a string stays text, an error followed by a string
/// becomes the record's error with the string as message, a bare error
/// becomes the message itself, anything else is opaque. The remainder
/// are format arguments.
fn classify(values: Vec<LogValue>) -> Classified {
    let mut queue: VecDeque<LogValue> = values.into();

    let local = if matches!(queue.front(), Some(value) if value.is_plain_object()) {
        match queue.pop_front() {
            Some(LogValue::Value(Value::Object(fields))) => Some(Context::from(fields)),
            _ => None,
        }
    } else {
        None
    };

    let (message, err) = match queue.pop_front() {
        None => (Message::None, None),
        Some(LogValue::Value(Value::String(text))) => (Message::Text(text), None),
        Some(LogValue::Error(error)) => {
            if matches!(queue.front(), Some(LogValue::Value(Value::String(_)))) {
                match queue.pop_front() {
                    Some(LogValue::Value(Value::String(text))) => {
                        (Message::Text(text), Some(error))
                    }
                    _ => (Message::Error(error), None),
                }
            } else {
                (Message::Error(error), None)
            }
        }
        Some(LogValue::Value(value)) => (Message::Other(value), None),
    };

    Classified {
        local,
        message,
        err,
        args: queue.into_iter().collect(),
    }
}

/// Builder for constructing a root logger
pub struct LoggerBuilder {
    level: Option<LogLevel>,
    format: Option<FormatRef>,
    format_name: Option<String>,
    sink: Option<SinkRef>,
    context_getter: Option<ContextGetter>,
    context: Context,
    read_env: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: None,
            format: None,
            format_name: None,
            sink: None,
            context_getter: None,
            context: Context::new(),
            read_env: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Use a custom formatter
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: FormatRef) -> Self {
        self.format = Some(format);
        self
    }

    /// Select a built-in formatter by name
    #[must_use = "builder methods return a new value"]
    pub fn format_name<S: Into<String>>(mut self, name: S) -> Self {
        self.format_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: crate::sinks::Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: SinkRef) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn() -> Context + Send + Sync + 'static,
    {
        self.context_getter = Some(Arc::new(getter));
        self
    }

    /// Stored context for the root logger
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Read `OPSLOG_LEVEL` / `OPSLOG_FORMAT` / `OPSLOG_ENV` at build
    /// time. Explicit builder settings win over the environment.
    #[must_use = "builder methods return a new value"]
    pub fn read_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    pub fn build(self) -> Logger {
        let formatters = Arc::new(Formatters::new());

        let mut level = self.level;
        let mut format = self.format;

        if format.is_none() {
            if let Some(name) = &self.format_name {
                format = formatters.by_name(name);
            }
        }

        if self.read_env {
            if level.is_none() {
                if let Ok(name) = std::env::var(ENV_LEVEL) {
                    level = Some(name.parse().unwrap_or_default());
                }
            }
            if format.is_none() {
                if let Ok(name) = std::env::var(ENV_FORMAT) {
                    format = formatters.by_name(&name);
                }
            }
            if format.is_none() && std::env::var(ENV_MODE).as_deref() == Ok("development") {
                format = Some(Arc::clone(&formatters.dev) as FormatRef);
            }
        }

        let level = level.unwrap_or_default();
        let format = format.unwrap_or_else(|| Arc::clone(&formatters.json) as FormatRef);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(StdoutSink::new()) as SinkRef);
        let context_getter = self
            .context_getter
            .unwrap_or_else(|| Arc::new(Context::new) as ContextGetter);

        Logger {
            inner: Arc::new(LoggerInner {
                parent: None,
                level: RwLock::new(Some(level)),
                format: RwLock::new(Some(format)),
                sink: RwLock::new(Some(sink)),
                context_getter: RwLock::new(Some(context_getter)),
                context: self.context,
                formatters,
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use serde_json::json;

    fn capture_logger() -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::builder()
            .shared_sink(Arc::clone(&sink) as SinkRef)
            .build();
        (logger, sink)
    }

    #[test]
    fn test_default_level_is_info() {
        let (logger, sink) = capture_logger();

        logger.debug("hidden");
        logger.info("visible");
        logger.warn("visible");

        assert_eq!(logger.level_name(), "INFO");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_level_threshold_is_monotonic() {
        let (logger, sink) = capture_logger();

        for threshold in LogLevel::ALL {
            logger.set_level(threshold);
            sink.take();
            for level in LogLevel::ALL {
                logger.log(level, "probe");
            }
            let expected = LogLevel::ALL.iter().filter(|l| **l >= threshold).count();
            assert_eq!(sink.len(), expected, "threshold {}", threshold);
        }
    }

    #[test]
    fn test_set_level_name_falls_back_on_invalid() {
        let (logger, _sink) = capture_logger();

        logger.set_level_name("fatal");
        assert_eq!(logger.level(), LogLevel::Fatal);

        logger.set_level_name("not-a-level");
        assert_eq!(logger.level(), LogLevel::Info);
    }

    #[test]
    fn test_classify_message_first() {
        let c = classify(vec![LogValue::from("hello %s"), LogValue::from("world")]);
        assert!(c.local.is_none());
        assert!(matches!(c.message, Message::Text(ref s) if s == "hello %s"));
        assert_eq!(c.args.len(), 1);
        assert!(c.err.is_none());
    }

    #[test]
    fn test_classify_context_first() {
        let c = classify(vec![
            LogValue::from(json!({"corr": "x"})),
            LogValue::from("msg"),
            LogValue::from(1),
        ]);
        assert_eq!(
            c.local.expect("context classified").get("corr"),
            Some(&json!("x"))
        );
        assert!(matches!(c.message, Message::Text(ref s) if s == "msg"));
        assert_eq!(c.args.len(), 1);
    }

    #[test]
    fn test_classify_array_is_not_context() {
        let c = classify(vec![LogValue::from(json!(["a", "b"]))]);
        assert!(c.local.is_none());
        assert!(matches!(c.message, Message::Other(Value::Array(_))));
    }

    #[test]
    fn test_classify_error_first_with_format() {
        let c = classify(vec![
            LogValue::error(std::io::Error::new(std::io::ErrorKind::Other, "boom")),
            LogValue::from("Format %s"),
            LogValue::from("works"),
        ]);
        assert!(matches!(c.message, Message::Text(ref s) if s == "Format %s"));
        assert!(c.err.is_some());
        assert_eq!(c.args.len(), 1);
    }

    #[test]
    fn test_classify_bare_error() {
        let c = classify(vec![LogValue::error(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        ))]);
        assert!(matches!(c.message, Message::Error(_)));
        assert!(c.err.is_none());
    }

    #[test]
    fn test_classify_empty_call() {
        let c = classify(vec![]);
        assert!(c.local.is_none());
        assert!(matches!(c.message, Message::None));
        assert!(c.args.is_empty());
    }

    #[test]
    fn test_context_layers_merge_in_order() {
        let (logger, sink) = capture_logger();
        logger.set_context_getter(|| {
            Context::new()
                .with_field("corr", "getter")
                .with_field("trans", "getter")
        });

        logger.info((Context::new().with_field("corr", "call"), "msg"));

        let line = sink.last().expect("one trace written");
        let parsed: Value = serde_json::from_str(&line).expect("json trace");
        assert_eq!(parsed["corr"], "call");
        assert_eq!(parsed["trans"], "getter");
    }

    #[test]
    fn test_child_merges_context_chain() {
        let (logger, sink) = capture_logger();
        logger.set_context_getter(|| Context::new().with_field("a", 1));

        let child1 = logger.child(Context::new().with_field("b", 2));
        let child2 = child1.child(Context::new().with_field("c", 3));
        let child3 = child2.child(Context::new().with_field("d", 4));

        child3.info("generations");

        let line = sink.last().expect("one trace written");
        let parsed: Value = serde_json::from_str(&line).expect("json trace");
        assert_eq!(parsed["a"], 1);
        assert_eq!(parsed["b"], 2);
        assert_eq!(parsed["c"], 3);
        assert_eq!(parsed["d"], 4);
    }

    #[test]
    fn test_child_keys_win_over_getter() {
        let (logger, sink) = capture_logger();
        logger.set_context_getter(|| {
            Context::new()
                .with_field("a", true)
                .with_field("b", "should be overwritten")
        });

        let child = logger.child(Context::new().with_field("b", true));
        child.info("tie");

        let line = sink.last().expect("one trace written");
        let parsed: Value = serde_json::from_str(&line).expect("json trace");
        assert_eq!(parsed["a"], true);
        assert_eq!(parsed["b"], true);
    }

    #[test]
    fn test_child_inherits_parent_level_until_set() {
        let (logger, sink) = capture_logger();
        logger.set_level(LogLevel::Error);

        let child = logger.child(Context::new());
        child.info("filtered by inherited level");
        assert!(sink.is_empty());

        logger.set_level(LogLevel::Debug);
        child.set_level(LogLevel::Error);
        child.info("filtered by own level");
        logger.info("passes parent level");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_child_uses_parent_sink() {
        let (logger, sink) = capture_logger();
        let child = logger.child(Context::new());

        child.info("through the parent sink");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_format_identity() {
        let (logger, _sink) = capture_logger();
        let formatters = logger.formatters();
        assert!(Arc::ptr_eq(
            &logger.format(),
            &(Arc::clone(&formatters.json) as FormatRef)
        ));

        logger.set_format_name("dev");
        assert!(Arc::ptr_eq(
            &logger.format(),
            &(Arc::clone(&formatters.dev) as FormatRef)
        ));
    }

    #[test]
    fn test_set_format_name_falls_back_on_invalid() {
        let (logger, _sink) = capture_logger();
        logger.set_format_name("dev");
        logger.set_format_name("xml");
        assert!(Arc::ptr_eq(
            &logger.format(),
            &(Arc::clone(&logger.formatters().json) as FormatRef)
        ));
    }

    #[test]
    fn test_formatting_panic_degrades_to_fallback_line() {
        struct PanickyFormatter;
        impl crate::formatters::Formatter for PanickyFormatter {
            fn format(&self, _record: &LogRecord) -> String {
                panic!("formatter bug");
            }
            fn name(&self) -> &'static str {
                "panicky"
            }
        }

        let (logger, sink) = capture_logger();
        logger.set_format(Arc::new(PanickyFormatter));

        logger.info("still produces a line");
        assert_eq!(
            sink.last().as_deref(),
            Some("INFO trace formatting failed")
        );
    }

    #[test]
    fn test_env_configuration() {
        std::env::set_var(ENV_LEVEL, "debug");
        std::env::set_var(ENV_FORMAT, "pipe");

        let logger = Logger::from_env();
        assert_eq!(logger.level(), LogLevel::Debug);
        assert!(Arc::ptr_eq(
            &logger.format(),
            &(Arc::clone(&logger.formatters().pipe) as FormatRef)
        ));

        std::env::remove_var(ENV_FORMAT);
        std::env::set_var(ENV_MODE, "development");
        let logger = Logger::from_env();
        assert!(Arc::ptr_eq(
            &logger.format(),
            &(Arc::clone(&logger.formatters().dev) as FormatRef)
        ));

        std::env::remove_var(ENV_LEVEL);
        std::env::remove_var(ENV_MODE);
    }
}

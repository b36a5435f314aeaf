//! Positional log-call arguments
//!
//! Every positional argument of a log call is a [`LogValue`]: either a
//! JSON value or a captured error. The dispatcher classifies a
//! `Vec<LogValue>` into context / message / args / error, so a call site
//! can lead with a context object, a format string, or an error, exactly
//! as the level methods document.

use serde::Serialize;
use serde_json::Value;

use super::error_info::LoggedError;
use super::log_context::Context;

/// A single positional argument in a log call
#[derive(Debug)]
pub enum LogValue {
    Value(Value),
    Error(LoggedError),
}

impl LogValue {
    /// Capture an error as a log-call argument
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LogValue::Error(LoggedError::capture(err))
    }

    /// Convert any serializable value into a log-call argument.
    ///
    /// Values that fail to serialize degrade to their type name rather
    /// than aborting the log call.
    pub fn from_serialize<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogValue::Value(value),
            Err(_) => LogValue::Value(Value::String(format!(
                "<unserializable {}>",
                std::any::type_name::<T>()
            ))),
        }
    }

    /// A plain data object: a JSON object, which classification treats
    /// as a per-call context when it leads the argument list
    pub fn is_plain_object(&self) -> bool {
        matches!(self, LogValue::Value(Value::Object(_)))
    }
}

impl From<Value> for LogValue {
    fn from(value: Value) -> Self {
        LogValue::Value(value)
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Value(Value::String(s.to_string()))
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Value(Value::String(s))
    }
}

impl From<i32> for LogValue {
    fn from(n: i32) -> Self {
        LogValue::Value(Value::from(n))
    }
}

impl From<i64> for LogValue {
    fn from(n: i64) -> Self {
        LogValue::Value(Value::from(n))
    }
}

impl From<u32> for LogValue {
    fn from(n: u32) -> Self {
        LogValue::Value(Value::from(n))
    }
}

impl From<u64> for LogValue {
    fn from(n: u64) -> Self {
        LogValue::Value(Value::from(n))
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        LogValue::Value(Value::from(n))
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Value(Value::Bool(b))
    }
}

impl From<Context> for LogValue {
    fn from(ctx: Context) -> Self {
        LogValue::Value(Value::Object(ctx.into_map()))
    }
}

impl From<LoggedError> for LogValue {
    fn from(err: LoggedError) -> Self {
        LogValue::Error(err)
    }
}

/// The message slot of a normalized log record
#[derive(Debug)]
pub enum Message {
    /// No message was supplied
    None,
    /// A (possibly printf-style) text message
    Text(String),
    /// The message is itself an error
    Error(LoggedError),
    /// An opaque non-string value used as the message
    Other(Value),
}

/// The positional arguments of one log call, before classification
#[derive(Debug, Default)]
pub struct Call {
    pub values: Vec<LogValue>,
}

impl Call {
    pub fn new(values: Vec<LogValue>) -> Self {
        Self { values }
    }
}

impl From<Vec<LogValue>> for Call {
    fn from(values: Vec<LogValue>) -> Self {
        Self { values }
    }
}

impl From<LogValue> for Call {
    fn from(value: LogValue) -> Self {
        Self { values: vec![value] }
    }
}

impl From<&str> for Call {
    fn from(s: &str) -> Self {
        Self { values: vec![LogValue::from(s)] }
    }
}

impl From<String> for Call {
    fn from(s: String) -> Self {
        Self { values: vec![LogValue::from(s)] }
    }
}

impl From<Value> for Call {
    fn from(value: Value) -> Self {
        Self { values: vec![LogValue::from(value)] }
    }
}

impl From<Context> for Call {
    fn from(ctx: Context) -> Self {
        Self { values: vec![LogValue::from(ctx)] }
    }
}

impl From<LoggedError> for Call {
    fn from(err: LoggedError) -> Self {
        Self { values: vec![LogValue::from(err)] }
    }
}

impl From<(Context, &str)> for Call {
    fn from((ctx, msg): (Context, &str)) -> Self {
        Self {
            values: vec![LogValue::from(ctx), LogValue::from(msg)],
        }
    }
}

impl From<(Context, String)> for Call {
    fn from((ctx, msg): (Context, String)) -> Self {
        Self {
            values: vec![LogValue::from(ctx), LogValue::from(msg)],
        }
    }
}

//! JSON trace formatter
//!
//! Emits one JSON object per trace: the merged context fields first,
//! then `time`, `lvl`, `msg` and (for error-first calls) `err`. Those
//! four keys belong to the formatter and can never be supplied through
//! context or argument objects.

use serde_json::{Map, Value};

use crate::core::error_info::ErrorInfo;
use crate::core::log_record::LogRecord;
use crate::core::log_value::{LogValue, Message};
use crate::core::template::{self, ErrStyle};
use crate::core::timestamp::iso8601;

use super::{Formatter, StacktraceLevels};

const RESERVED_KEYS: [&str; 4] = ["time", "lvl", "msg", "err"];

pub struct JsonFormatter {
    stacktraces_with: StacktraceLevels,
}

impl JsonFormatter {
    pub(crate) fn new(stacktraces_with: StacktraceLevels) -> Self {
        Self { stacktraces_with }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut out = Map::new();

        for (key, value) in record.context.fields() {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                out.insert(key.clone(), value.clone());
            }
        }

        let with_stack = self.stacktraces_with.read().contains(&record.level);
        let mut err_info = record
            .err
            .as_ref()
            .map(|err| ErrorInfo::from_error(err, with_stack));

        // Interpolate as many leading args as the message has
        // placeholders. Among the rest, plain objects become top-level
        // fields; everything else is appended to the message text.
        let (mut body, consumed) = match &record.message {
            Message::Text(fmt) => {
                let wanted = template::count_placeholders(fmt).min(record.args.len());
                template::fill_placeholders(fmt, &record.args[..wanted], ErrStyle::Short)
            }
            Message::Error(err) => {
                if err_info.is_none() {
                    err_info = Some(ErrorInfo::from_error(err, with_stack));
                }
                (err.short(), 0)
            }
            Message::Other(value) => (template::value_to_string(value), 0),
            Message::None => (String::new(), 0),
        };

        for arg in &record.args[consumed..] {
            match arg {
                LogValue::Value(Value::Object(fields)) => {
                    for (key, value) in fields {
                        if !RESERVED_KEYS.contains(&key.as_str()) && !out.contains_key(key) {
                            out.insert(key.clone(), value.clone());
                        }
                    }
                }
                other => {
                    if !body.is_empty() {
                        body.push(' ');
                    }
                    body.push_str(&template::to_display_string(other, ErrStyle::Short));
                }
            }
        }

        out.insert(
            "time".to_string(),
            Value::String(iso8601(&record.timestamp)),
        );
        out.insert(
            "lvl".to_string(),
            Value::String(record.level.to_str().to_string()),
        );
        out.insert("msg".to_string(), Value::String(body.trim().to_string()));

        if let Some(info) = err_info {
            let err_value = serde_json::to_value(&info)
                .unwrap_or_else(|_| Value::String(info.stack.clone()));
            out.insert("err".to_string(), err_value);
        }

        serde_json::to_string(&Value::Object(out)).unwrap_or_else(|_| {
            format!(
                r#"{{"time":"{}","lvl":"{}","msg":"trace could not be serialized"}}"#,
                iso8601(&record.timestamp),
                record.level.to_str()
            )
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

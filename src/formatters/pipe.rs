//! Legacy pipe-delimited trace formatter
//!
//! `time=<ISO8601> | lvl=<LEVEL> | corr=<c> | trans=<t> | op=<o>
//! [| key=value ...] | msg=<text>`
//!
//! Absent corr/trans/op fields render the configurable not-available
//! placeholder. Extra context fields are emitted before `msg` in
//! insertion order. Error stacks are always appended in full; this
//! format predates the stack-trace level set.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::core::log_context::{FIELD_CORR, FIELD_OP, FIELD_TRANS};
use crate::core::log_record::LogRecord;
use crate::core::template::{self, ErrStyle};
use crate::core::timestamp::iso8601;

use super::{render_body, Formatter};

pub struct PipeFormatter {
    not_available: Arc<RwLock<String>>,
}

impl PipeFormatter {
    pub(crate) fn new(not_available: Arc<RwLock<String>>) -> Self {
        Self { not_available }
    }

    fn reserved_field(&self, record: &LogRecord, key: &str) -> String {
        match record.context.get(key) {
            Some(Value::Null) | None => self.not_available.read().clone(),
            Some(Value::String(s)) if s.is_empty() => self.not_available.read().clone(),
            Some(value) => template::value_to_string(value),
        }
    }
}

impl Formatter for PipeFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut parts = vec![
            format!("time={}", iso8601(&record.timestamp)),
            format!("lvl={}", record.level.to_str()),
            format!("corr={}", self.reserved_field(record, FIELD_CORR)),
            format!("trans={}", self.reserved_field(record, FIELD_TRANS)),
            format!("op={}", self.reserved_field(record, FIELD_OP)),
        ];

        for (key, value) in record.context.fields() {
            if key != FIELD_CORR && key != FIELD_TRANS && key != FIELD_OP {
                parts.push(format!("{}={}", key, template::value_to_string(value)));
            }
        }

        let mut msg = render_body(&record.message, &record.args, ErrStyle::Stack);
        if let Some(err) = &record.err {
            if err.short() != msg {
                msg.push(' ');
                msg.push_str(&err.stack());
            }
        }
        parts.push(format!("msg={}", msg));

        parts.join(" | ")
    }

    fn name(&self) -> &'static str {
        "pipe"
    }
}

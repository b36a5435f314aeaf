//! Development trace formatter
//!
//! Human-oriented output: a colorized level label, the console-style
//! message body, the per-call context as compact JSON (minus the keys
//! in `omit`), and error chains as a dimmed, reindented block under the
//! label column.

use colored::Colorize;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::core::log_level::LogLevel;
use crate::core::log_record::LogRecord;
use crate::core::log_value::Message;
use crate::core::template::ErrStyle;

use super::{render_body, Formatter, StacktraceLevels};

/// Width of the level label column: the longest level name
const LABEL_WIDTH: usize = 5;

/// Indent applied to continuation lines so they align under the label
const CONTINUATION_INDENT: &str = "\n      ";

pub struct DevFormatter {
    stacktraces_with: StacktraceLevels,
    omit: RwLock<Vec<String>>,
    colors: RwLock<Option<bool>>,
}

impl DevFormatter {
    pub(crate) fn new(stacktraces_with: StacktraceLevels) -> Self {
        Self {
            stacktraces_with,
            omit: RwLock::new(Vec::new()),
            colors: RwLock::new(None),
        }
    }

    /// Context keys excluded from the inline context dump
    pub fn omit(&self) -> Vec<String> {
        self.omit.read().clone()
    }

    /// Replace the omitted-key set. Read at format time, so the change
    /// affects all subsequent calls immediately.
    pub fn set_omit<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.omit.write() = keys.into_iter().map(Into::into).collect();
    }

    /// Force colors on or off; `None` restores terminal auto-detection
    pub fn set_colors(&self, colors: Option<bool>) {
        *self.colors.write() = colors;
    }

    fn colors_enabled(&self) -> bool {
        self.colors
            .read()
            .unwrap_or_else(|| colored::control::SHOULD_COLORIZE.should_colorize())
    }

    fn label(&self, level: LogLevel, colors: bool) -> String {
        let name = level.to_str();
        let pad = " ".repeat(LABEL_WIDTH - name.len() + 1);
        if !colors {
            return format!("{}{}", name, pad);
        }
        let styled = match level {
            LogLevel::Fatal => name.red().bold().on_red(),
            _ => name.color(level.color_code()),
        };
        format!("{}{}", styled, pad)
    }

    fn dim(&self, text: String, colors: bool) -> String {
        if colors {
            text.dimmed().to_string()
        } else {
            text
        }
    }
}

impl Formatter for DevFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let colors = self.colors_enabled();
        let with_stack = self.stacktraces_with.read().contains(&record.level);

        let mut out = self.label(record.level, colors);

        let body = match &record.message {
            Message::Error(err) => err.short(),
            other => render_body(other, &record.args, ErrStyle::Short),
        };
        out.push_str(&body);

        if let Some(local) = &record.local_context {
            let omit = self.omit.read();
            let dump: Map<String, Value> = local
                .fields()
                .iter()
                .filter(|(key, _)| !omit.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            out.push(' ');
            out.push_str(
                &serde_json::to_string(&dump).unwrap_or_else(|_| "{}".to_string()),
            );
        }

        // The message-is-an-error case appends its own chain; an
        // error-first call appends the chain when the level prints
        // stacks, or the short form when it differs from the body.
        match (&record.message, &record.err) {
            (Message::Error(err), _) if with_stack => {
                out.push('\n');
                out.push_str(&self.dim(err.render_chain(), colors));
            }
            (_, Some(err)) => {
                if with_stack {
                    out.push('\n');
                    out.push_str(&self.dim(err.render_chain(), colors));
                } else if err.short() != body {
                    out.push('\n');
                    out.push_str(&self.dim(err.short(), colors));
                }
            }
            _ => {}
        }

        out.replace('\n', CONTINUATION_INDENT)
    }

    fn name(&self) -> &'static str {
        "dev"
    }
}

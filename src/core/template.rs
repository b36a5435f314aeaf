//! Printf-style message templating
//!
//! Trace messages may contain `%s`, `%d` and `%j` placeholders, filled
//! from the call's positional arguments the way `console.log` does it:
//! `%s` coerces to a string, `%d` to a number (`NaN` when the argument is
//! not numeric), `%j` serializes as JSON. `%%` is a literal percent sign
//! and never consumes an argument. Placeholders without a matching
//! argument are left in the text verbatim; arguments without a matching
//! placeholder are appended space-separated.

use serde_json::Value;

use super::error_info::LoggedError;
use super::log_value::LogValue;

/// How an error argument renders inside message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrStyle {
    /// `Name: message`
    Short,
    /// Full stack text (the pipe format appends stacks unconditionally)
    Stack,
}

/// Count the `%s`/`%d`/`%j` placeholders in a format string.
/// `%%` escapes a literal percent and is not counted.
pub fn count_placeholders(fmt: &str) -> usize {
    let mut count = 0;
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
            }
            Some('s') | Some('d') | Some('j') => {
                chars.next();
                count += 1;
            }
            _ => {}
        }
    }
    count
}

/// Fill placeholders from `args`, returning the filled string and the
/// number of arguments consumed. Placeholders beyond the argument count
/// stay literal.
pub fn fill_placeholders(fmt: &str, args: &[LogValue], errs: ErrStyle) -> (String, usize) {
    let mut out = String::with_capacity(fmt.len() + 16);
    let mut used = 0;
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(&spec) if spec == 's' || spec == 'd' || spec == 'j' => {
                if used < args.len() {
                    chars.next();
                    let arg = &args[used];
                    used += 1;
                    let filled = match spec {
                        's' => to_display_string(arg, errs),
                        'd' => to_number_string(arg),
                        _ => to_json_string(arg),
                    };
                    out.push_str(&filled);
                } else {
                    out.push('%');
                }
            }
            _ => out.push('%'),
        }
    }
    (out, used)
}

/// console.log-style formatting: fill placeholders, then append any
/// leftover arguments space-separated.
pub fn format_message(fmt: &str, args: &[LogValue], errs: ErrStyle) -> String {
    let (mut out, used) = fill_placeholders(fmt, args, errs);
    for arg in &args[used..] {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&to_display_string(arg, errs));
    }
    out
}

/// String coercion for `%s` and appended arguments. Scalars render
/// bare; objects and arrays render as compact JSON.
pub fn to_display_string(value: &LogValue, errs: ErrStyle) -> String {
    match value {
        LogValue::Value(v) => value_to_string(v),
        LogValue::Error(e) => error_to_string(e, errs),
    }
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

fn error_to_string(err: &LoggedError, errs: ErrStyle) -> String {
    match errs {
        ErrStyle::Short => err.short(),
        ErrStyle::Stack => err.stack(),
    }
}

/// Number coercion for `%d`: numbers render as-is, numeric strings are
/// parsed, booleans map to 1/0, everything else is `NaN`.
fn to_number_string(value: &LogValue) -> String {
    match value {
        LogValue::Value(Value::Number(n)) => n.to_string(),
        LogValue::Value(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => format!("{}", n as i64),
            Ok(n) => n.to_string(),
            Err(_) => "NaN".to_string(),
        },
        LogValue::Value(Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
        _ => "NaN".to_string(),
    }
}

/// JSON coercion for `%j`
fn to_json_string(value: &LogValue) -> String {
    match value {
        LogValue::Value(v) => {
            serde_json::to_string(v).unwrap_or_else(|_| "null".to_string())
        }
        LogValue::Error(e) => {
            serde_json::to_string(&e.short()).unwrap_or_else(|_| "null".to_string())
        }
    }
}

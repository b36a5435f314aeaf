//! Error capture and causal-chain serialization
//!
//! An error entering a log call is wrapped in a [`LoggedError`], which
//! records the concrete error type name and a backtrace (captured only
//! when `RUST_BACKTRACE` enables it) alongside the boxed error itself.
//! At format time the chain of `std::error::Error::source()` links is
//! walked into an [`ErrorInfo`] tree for JSON output, or rendered as a
//! `Caused by:` text block for the dev format.

use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

/// Upper bound on cause-chain traversal. Chains are assumed acyclic;
/// the cap stops a (buggy) cyclic chain from hanging the logger.
const MAX_CAUSE_DEPTH: usize = 100;

/// An error captured at a log call site.
pub struct LoggedError {
    kind: &'static str,
    backtrace: Backtrace,
    inner: Box<dyn StdError + Send + Sync>,
}

impl LoggedError {
    /// Capture an error, recording its concrete type name and a
    /// backtrace of the capturing call site.
    pub fn capture<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: std::any::type_name::<E>(),
            backtrace: Backtrace::capture(),
            inner: Box::new(err),
        }
    }

    /// The full path of the captured error type
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The error type name without module path or generic arguments
    pub fn name(&self) -> &str {
        let base = self.kind.split('<').next().unwrap_or(self.kind);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// The error's display message
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// `Name: message` — the stand-in for a stack when traces are off
    /// or no backtrace was captured
    pub fn short(&self) -> String {
        format!("{}: {}", self.name(), self.message())
    }

    /// The stack text: `Name: message`, followed by the captured
    /// backtrace when one is available
    pub fn stack(&self) -> String {
        match self.backtrace.status() {
            BacktraceStatus::Captured => format!("{}\n{}", self.short(), self.backtrace),
            _ => self.short(),
        }
    }

    /// The underlying error
    pub fn inner(&self) -> &(dyn StdError + 'static) {
        self.inner.as_ref()
    }

    /// Iterate the cause chain, outermost cause first, capped at
    /// [`MAX_CAUSE_DEPTH`] entries.
    pub fn causes(&self) -> Vec<&(dyn StdError + 'static)> {
        let mut causes = Vec::new();
        let mut current = self.inner().source();
        while let Some(cause) = current {
            if causes.len() >= MAX_CAUSE_DEPTH {
                break;
            }
            causes.push(cause);
            current = cause.source();
        }
        causes
    }

    /// Render the error and its cause chain as a text block:
    /// the stack, then one `Caused by:` line per cause.
    pub fn render_chain(&self) -> String {
        let mut out = self.stack();
        for cause in self.causes() {
            out.push_str("\nCaused by: Error: ");
            out.push_str(&cause.to_string());
        }
        out
    }
}

impl fmt::Debug for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedError")
            .field("kind", &self.kind)
            .field("message", &self.inner.to_string())
            .finish()
    }
}

impl fmt::Display for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Serializable view of an error and its cause chain
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorInfo {
    pub name: String,
    pub message: String,
    pub constructor: String,
    pub stack: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ErrorInfo>,
}

impl ErrorInfo {
    /// Build the serializable view of a captured error.
    ///
    /// `with_stack` selects full stack text (levels listed in the
    /// formatters' stack-trace set) or the short representation.
    /// Causes carry the generic name `Error`: their concrete type is
    /// erased behind `source()`.
    pub fn from_error(err: &LoggedError, with_stack: bool) -> Self {
        let causes = err
            .causes()
            .into_iter()
            .map(|cause| {
                let message = cause.to_string();
                ErrorInfo {
                    name: "Error".to_string(),
                    message: message.clone(),
                    constructor: "Error".to_string(),
                    stack: format!("Error: {}", message),
                    causes: Vec::new(),
                }
            })
            .collect();

        ErrorInfo {
            name: err.name().to_string(),
            message: err.message(),
            constructor: err.kind().to_string(),
            stack: if with_stack { err.stack() } else { err.short() },
            causes,
        }
    }
}

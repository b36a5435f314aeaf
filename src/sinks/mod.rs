//! Sink implementations
//!
//! A [`Sink`] is the write destination for formatted trace lines. The
//! logger performs exactly one `write_line` per call; buffering and
//! flushing are the sink's own business.

pub mod file;
pub mod memory;
pub mod stdout;

use std::sync::Arc;

use crate::core::error::Result;

pub use file::FileSink;
pub use memory::MemorySink;
pub use stdout::{StderrSink, StdoutSink};

pub trait Sink: Send + Sync {
    /// Write one formatted trace line; the sink appends the newline.
    fn write_line(&self, line: &str) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// A shareable sink reference
pub type SinkRef = Arc<dyn Sink>;

//! In-memory sink
//!
//! Captures trace lines in a vector. Used by the test suites and by
//! embedders that want to inspect output programmatically.

use parking_lot::Mutex;

use crate::core::error::Result;

use super::Sink;

#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, in write order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// The most recently written line
    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }

    /// Drain and return all captured lines
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

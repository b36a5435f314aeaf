//! Standard stream sinks

use std::io::Write;

use crate::core::error::Result;

use super::Sink;

/// Writes trace lines to standard output
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(line.as_bytes())?;
        handle.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// Writes trace lines to standard error
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        handle.write_all(line.as_bytes())?;
        handle.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stderr().lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stderr"
    }
}

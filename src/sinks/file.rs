//! File sink implementation

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::error::Result;

use super::Sink;

/// Appends trace lines to a file through a buffered writer
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
    path: String,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.as_ref().display().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

use crate::record::LogRecord;
use std::error::Error;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for [`LogRecord`]s produced by the logger.
///
/// Implementations handle formatting and transport. `write` is called on
/// the thread that logs, so it should be quick; errors are reported on
/// stderr by the caller and otherwise ignored.
pub trait LogWriter: Send + Sync {
    /// Write a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted.
    /// - `Err(..)` if the output failed (I/O, serialization, ...).
    fn write(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush buffered output. Called before the process exits on `fatal`.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Writes every record as one line of JSON.
pub struct JsonWriter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonWriter {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self { out: Mutex::new(Box::new(out)) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl LogWriter for JsonWriter {
    fn write(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let mut out = self.out.lock().map_err(|_| "log output mutex poisoned")?;
        out.write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut out = self.out.lock().map_err(|_| "log output mutex poisoned")?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps records in memory. Clones share the same buffer.
///
/// Meant for tests that assert on what was logged.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<LogRecord> {
        self.records.lock().ok().and_then(|r| r.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl LogWriter for MemoryWriter {
    fn write(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.records
            .lock()
            .map_err(|_| "memory writer mutex poisoned")?
            .push(record.clone());
        Ok(())
    }
}

#![allow(dead_code)]

use context_logger::{ErrorReporter, LogCore, MemoryWriter};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Reporter that remembers the message of every captured error.
#[derive(Default)]
pub struct RecordingReporter {
    captured: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn captured(&self) -> Vec<String> {
        self.captured.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn capture_exception(&self, err: &(dyn Error + Send + Sync + 'static)) {
        self.captured.lock().unwrap().push(err.to_string());
    }
}

#[derive(thiserror::Error, Debug)]
#[error("upstream timed out")]
pub struct UpstreamTimeout;

pub fn panicking_exit(code: i32) -> ! {
    panic!("process exit requested with code {code}")
}

pub fn memory_core() -> (Arc<LogCore>, MemoryWriter) {
    let writer = MemoryWriter::new();
    let core = Arc::new(LogCore::new(Arc::new(writer.clone())).with_exit(panicking_exit));
    (core, writer)
}

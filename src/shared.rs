use crate::context::LogContext;
use crate::level::Level;
use crate::logger::ContextLogger;
use crate::record::LogRecord;
use crate::writer::{JsonWriter, LogWriter};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

/// Hook run by `fatal` once the record has been written.
pub type ExitFn = fn(i32) -> !;

/// Exit code used by `fatal`.
pub const FATAL_EXIT_CODE: i32 = 1;

static DEFAULT_CORE: OnceLock<Arc<LogCore>> = OnceLock::new();

/// State shared by every logger handle created from it: the writer, the
/// severity threshold and the exit hook.
///
/// The threshold is the only mutable part. Changing it through any handle
/// is visible to all handles of the same core.
pub struct LogCore {
    writer: Arc<dyn LogWriter>,
    threshold: AtomicU8,
    exit: ExitFn,
}

impl LogCore {
    /// New core writing to `writer`, with threshold [`Level::Debug`].
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        Self {
            writer,
            threshold: AtomicU8::new(Level::Debug as u8),
            exit: std::process::exit,
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    /// Replace the hook used by `fatal` (tests swap in a panicking one).
    pub fn with_exit(mut self, exit: ExitFn) -> Self {
        self.exit = exit;
        self
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Create a logger handle for `ctx` backed by this core.
    pub fn entry(self: &Arc<Self>, ctx: Option<Arc<dyn LogContext>>) -> ContextLogger {
        ContextLogger::new(Arc::clone(self), ctx)
    }

    pub(crate) fn write(&self, record: &LogRecord) {
        if let Err(e) = self.writer.write(record) {
            eprintln!("failed to write log record: {}", e);
        }
    }

    pub fn flush(&self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("failed to flush log writer: {}", e);
        }
    }

    pub(crate) fn exit(&self, code: i32) -> ! {
        self.flush();
        (self.exit)(code)
    }
}

impl fmt::Debug for LogCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCore").field("level", &self.level()).finish()
    }
}

/// Install `core` as the process-wide default.
///
/// Returns the rejected core if a default already exists (installed
/// earlier or created lazily by [`default_core`]).
pub fn set_default_core(core: Arc<LogCore>) -> Result<(), Arc<LogCore>> {
    DEFAULT_CORE.set(core)
}

/// Process-wide default core. Falls back to JSON on stdout at
/// [`Level::Debug`] when nothing was installed.
pub fn default_core() -> Arc<LogCore> {
    Arc::clone(DEFAULT_CORE.get_or_init(|| Arc::new(LogCore::new(Arc::new(JsonWriter::stdout())))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Fields;
    use crate::writer::MemoryWriter;

    #[test]
    fn threshold_round_trips_and_filters() {
        let core = LogCore::new(Arc::new(MemoryWriter::new())).with_level(Level::Warn);
        assert_eq!(core.level(), Level::Warn);
        assert!(!core.is_enabled(Level::Info));
        assert!(core.is_enabled(Level::Warn));
        assert!(core.is_enabled(Level::Panic));
    }

    #[test]
    fn write_goes_to_writer() {
        let writer = MemoryWriter::new();
        let core = LogCore::new(Arc::new(writer.clone()));
        core.write(&LogRecord::new(Level::Info, "hi", Fields::new()));
        assert_eq!(writer.records().len(), 1);
    }

    fn panicking_exit(code: i32) -> ! {
        panic!("exit({code})")
    }

    #[test]
    #[should_panic(expected = "exit(1)")]
    fn exit_uses_hook() {
        let core = LogCore::new(Arc::new(MemoryWriter::new())).with_exit(panicking_exit);
        core.exit(FATAL_EXIT_CODE);
    }
}

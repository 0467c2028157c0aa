use crate::fields::{Fields, CALLER_KEY};
use crate::level::Level;
use crate::record::LogRecord;
use crate::writer::LogWriter;
use std::error::Error;

/// Target used for events emitted by [`TracingWriter`].
pub const TRACING_TARGET: &str = "context_logger";

/// [`LogWriter`] that hands records over to the `tracing` ecosystem.
///
/// Each record becomes one event: `caller` as its own field and the
/// remaining fields as a JSON object in `fields`. `fatal` and `panic`
/// records are emitted at `ERROR`, the highest `tracing` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingWriter;

impl TracingWriter {
    pub fn new() -> Self {
        Self
    }
}

fn split_caller(fields: &Fields) -> (String, serde_json::Value) {
    let caller = fields
        .get(CALLER_KEY)
        .map(|c| c.to_string())
        .unwrap_or_default();
    let rest: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .filter(|(k, _)| k.as_str() != CALLER_KEY)
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    (caller, serde_json::Value::Object(rest))
}

impl LogWriter for TracingWriter {
    fn write(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let (caller, fields) = split_caller(&record.fields);
        let message = record.message.as_str();
        match record.level {
            Level::Debug => {
                tracing::debug!(target: TRACING_TARGET, caller = %caller, fields = %fields, "{}", message)
            }
            Level::Info => {
                tracing::info!(target: TRACING_TARGET, caller = %caller, fields = %fields, "{}", message)
            }
            Level::Warn => {
                tracing::warn!(target: TRACING_TARGET, caller = %caller, fields = %fields, "{}", message)
            }
            Level::Error | Level::Fatal | Level::Panic => {
                tracing::error!(
                    target: TRACING_TARGET,
                    caller = %caller,
                    fields = %fields,
                    severity = record.level.as_str(),
                    "{}",
                    message
                )
            }
        }
        Ok(())
    }
}

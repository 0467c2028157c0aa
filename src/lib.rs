//! Structured logging facade.
//!
//! A [`ContextLogger`] turns a message plus a flat `key, value, ...` list
//! into a [`LogRecord`], adds the call site and the trace ids found in the
//! ambient [`LogContext`], and writes it through a [`LogWriter`]. Records at
//! `error` and above are also forwarded to the context's [`ErrorReporter`].
//!
//! ```
//! use std::sync::Arc;
//! use context_logger::{kv, Context, LogCore, Logger, MemoryWriter};
//!
//! let writer = MemoryWriter::new();
//! let core = Arc::new(LogCore::new(Arc::new(writer.clone())));
//! let ctx = Context::new().with_span_ids("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
//!
//! let log = core.entry(Some(ctx.into_shared())).with_values(kv!["request_id", "r-17"]);
//! log.info("user created", kv!["user_id", 42]);
//!
//! let record = writer.last().unwrap();
//! assert_eq!(record.fields["traceID"].to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
//! ```

pub mod caller;
pub mod context;
pub mod fields;
pub mod level;
pub mod logger;
pub mod record;
pub mod report;
pub mod reporter;
pub mod shared;
pub mod trace;
pub mod tracing_writer;
pub mod value;
pub mod writer;

pub mod env;
pub mod init;

pub use crate::caller::CallSite;
pub use crate::context::{Context, ErrorReporter, LogContext, SpanIds, TraceProvider};
pub use crate::fields::{merge_fields, Fields};
pub use crate::level::Level;
pub use crate::logger::{entry, ContextLogger, Logger, NoopLogger};
pub use crate::record::LogRecord;
pub use crate::shared::{default_core, LogCore};
pub use crate::value::Value;
pub use crate::writer::{JsonWriter, LogWriter, MemoryWriter};

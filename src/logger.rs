use crate::caller::CallSite;
use crate::context::LogContext;
use crate::fields::{merge_into, Fields, CALLER_KEY, ERROR_KEY};
use crate::level::Level;
use crate::record::LogRecord;
use crate::report::report_errors;
use crate::shared::{default_core, LogCore, FATAL_EXIT_CODE};
use crate::trace;
use crate::value::Value;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Logging interface handed to application code.
///
/// Key/value arguments are a flat `key, value, ...` list (see
/// [`merge_fields`](crate::merge_fields) for how malformed lists are
/// handled).
///
/// The level methods record the file and line they were called from, but
/// the function part of `caller` is always `unknown`: a `#[track_caller]`
/// location carries no function name. Use the `log_*!` macros
/// ([`log_info!`](crate::log_info) and friends) to get
/// `<file>:<line> <module>::<function>`.
///
/// The trait is not object safe (`Clone` supertrait, generic
/// `with_error`). Swap implementations such as [`NoopLogger`] by taking
/// `L: Logger` as a type parameter instead of `dyn Logger`.
pub trait Logger: Clone + Send + Sync {
    /// Change the severity threshold shared by this handle and every handle
    /// created from the same core.
    fn set_level(&self, level: Level) -> &Self;

    /// Emit a record at `level`. `Fatal` and `Panic` never return.
    fn emit(&self, level: Level, site: CallSite, msg: &str, kv: &[Value]);

    /// New handle with `kv` merged over the current fields. `self` is left
    /// untouched.
    fn with_values(&self, kv: &[Value]) -> Self;

    /// New handle carrying `err` under the `error` field.
    fn with_error<E>(&self, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.with_values(&[Value::from(ERROR_KEY), Value::error(err)])
    }

    #[track_caller]
    fn debug(&self, msg: &str, kv: &[Value]) {
        self.emit(Level::Debug, CallSite::caller(), msg, kv)
    }

    #[track_caller]
    fn info(&self, msg: &str, kv: &[Value]) {
        self.emit(Level::Info, CallSite::caller(), msg, kv)
    }

    #[track_caller]
    fn warn(&self, msg: &str, kv: &[Value]) {
        self.emit(Level::Warn, CallSite::caller(), msg, kv)
    }

    /// Logs and forwards the message and any error fields to the error
    /// reporter of the context.
    #[track_caller]
    fn error(&self, msg: &str, kv: &[Value]) {
        self.emit(Level::Error, CallSite::caller(), msg, kv)
    }

    /// Like [`error`](Logger::error), then terminates the process.
    #[track_caller]
    fn fatal(&self, msg: &str, kv: &[Value]) -> ! {
        self.fatal_at(CallSite::caller(), msg, kv)
    }

    /// Like [`error`](Logger::error), then panics with `msg`.
    #[track_caller]
    fn panic(&self, msg: &str, kv: &[Value]) -> ! {
        self.panic_at(CallSite::caller(), msg, kv)
    }

    fn fatal_at(&self, site: CallSite, msg: &str, kv: &[Value]) -> ! {
        self.emit(Level::Fatal, site, msg, kv);
        std::process::exit(FATAL_EXIT_CODE)
    }

    fn panic_at(&self, site: CallSite, msg: &str, kv: &[Value]) -> ! {
        self.emit(Level::Panic, site, msg, kv);
        panic!("{}", msg)
    }
}

/// Handle for the ambient context `ctx`, backed by the process-wide
/// default core.
///
/// Trace ids reachable from `ctx` are attached as `traceID`/`spanID`.
pub fn entry(ctx: Option<Arc<dyn LogContext>>) -> ContextLogger {
    default_core().entry(ctx)
}

/// The [`Logger`] implementation.
///
/// Cheap to clone. Fields are shared between a handle and the handles
/// derived from it and copied when a derived handle adds to them.
#[derive(Clone)]
pub struct ContextLogger {
    core: Arc<LogCore>,
    fields: Arc<Fields>,
    ctx: Option<Arc<dyn LogContext>>,
}

impl ContextLogger {
    pub fn new(core: Arc<LogCore>, ctx: Option<Arc<dyn LogContext>>) -> Self {
        let mut fields = Fields::new();
        trace::enrich(&mut fields, ctx.as_deref());
        Self {
            core,
            fields: Arc::new(fields),
            ctx,
        }
    }

    /// Fields accumulated on this handle.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn context(&self) -> Option<&dyn LogContext> {
        self.ctx.as_deref()
    }

    pub fn core(&self) -> &Arc<LogCore> {
        &self.core
    }

    fn record_fields(&self, site: CallSite, kv: &[Value]) -> Fields {
        let mut fields = Fields::clone(&self.fields);
        merge_into(&mut fields, kv);
        fields.insert(CALLER_KEY.to_string(), Value::Str(site.resolve()));
        fields
    }
}

impl Logger for ContextLogger {
    fn set_level(&self, level: Level) -> &Self {
        self.core.set_level(level);
        self
    }

    fn emit(&self, level: Level, site: CallSite, msg: &str, kv: &[Value]) {
        let enabled = self.core.is_enabled(level);
        if enabled || level.reports_errors() {
            let fields = self.record_fields(site, kv);
            if level.reports_errors() {
                report_errors(self.ctx.as_deref(), msg, &fields);
            }
            if enabled {
                self.core.write(&LogRecord::new(level, msg, fields));
            }
        }

        match level {
            Level::Fatal => self.core.exit(FATAL_EXIT_CODE),
            Level::Panic => panic!("{}", msg),
            _ => {}
        }
    }

    fn with_values(&self, kv: &[Value]) -> Self {
        if kv.is_empty() {
            return self.clone();
        }
        let mut fields = Fields::clone(&self.fields);
        merge_into(&mut fields, kv);
        Self {
            core: Arc::clone(&self.core),
            fields: Arc::new(fields),
            ctx: self.ctx.clone(),
        }
    }
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger")
            .field("core", &self.core)
            .field("fields", &self.fields)
            .field("has_context", &self.ctx.is_some())
            .finish()
    }
}

/// Logger that drops every record. `fatal` still exits and `panic` still
/// panics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn set_level(&self, _level: Level) -> &Self {
        self
    }

    fn emit(&self, level: Level, _site: CallSite, msg: &str, _kv: &[Value]) {
        match level {
            Level::Fatal => std::process::exit(FATAL_EXIT_CODE),
            Level::Panic => panic!("{}", msg),
            _ => {}
        }
    }

    fn with_values(&self, _kv: &[Value]) -> Self {
        *self
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($logger:expr, $level:expr, $msg:expr $(, $kv:expr)*) => {{
        use $crate::Logger as _;
        ($logger).emit($level, $crate::call_site!(), $msg, $crate::kv![$($kv),*])
    }};
}

/// `log_debug!(logger, "msg", "key", value, ...)`
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_at!($logger, $crate::Level::Debug, $msg $(, $kv)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_at!($logger, $crate::Level::Info, $msg $(, $kv)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_at!($logger, $crate::Level::Warn, $msg $(, $kv)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {
        $crate::__log_at!($logger, $crate::Level::Error, $msg $(, $kv)*)
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {{
        use $crate::Logger as _;
        ($logger).fatal_at($crate::call_site!(), $msg, $crate::kv![$($kv),*])
    }};
}

#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $msg:expr $(, $kv:expr)* $(,)?) => {{
        use $crate::Logger as _;
        ($logger).panic_at($crate::call_site!(), $msg, $crate::kv![$($kv),*])
    }};
}

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Trace and span identifiers of an active span, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanIds {
    pub trace_id: String,
    pub span_id: String,
}

impl SpanIds {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self { trace_id: trace_id.into(), span_id: span_id.into() }
    }

    /// `true` when either id is empty or all zeros, which means "no trace".
    pub fn is_null(&self) -> bool {
        is_null_id(&self.trace_id) || is_null_id(&self.span_id)
    }
}

pub fn is_null_id(id: &str) -> bool {
    id.chars().all(|c| c == '0')
}

/// Something that knows the currently active span.
pub trait TraceProvider: Send + Sync {
    fn span_ids(&self) -> Option<SpanIds>;
}

impl TraceProvider for SpanIds {
    fn span_ids(&self) -> Option<SpanIds> {
        Some(self.clone())
    }
}

/// Client of an error-reporting backend.
///
/// Captures are fire-and-forget: delivery, batching and retries belong to
/// the implementation.
pub trait ErrorReporter: Send + Sync {
    fn capture_exception(&self, err: &(dyn Error + Send + Sync + 'static));
}

/// Ambient context handed to [`entry`](crate::entry).
///
/// Every capability is optional; absence is the normal case and simply
/// disables the matching enrichment.
pub trait LogContext: Send + Sync {
    fn trace_provider(&self) -> Option<&dyn TraceProvider> {
        None
    }

    fn error_reporter(&self) -> Option<&dyn ErrorReporter> {
        None
    }

    /// Context owned by an external tracing hub. When present, spans are
    /// looked up there first.
    fn hub_context(&self) -> Option<&dyn LogContext> {
        None
    }
}

/// Default [`LogContext`] implementation, built up with `with_*` calls.
#[derive(Clone, Default)]
pub struct Context {
    span: Option<Arc<dyn TraceProvider>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    hub: Option<Arc<Context>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(mut self, span: Arc<dyn TraceProvider>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_span_ids(self, trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        self.with_span(Arc::new(SpanIds::new(trace_id, span_id)))
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_hub(mut self, hub: Context) -> Self {
        self.hub = Some(Arc::new(hub));
        self
    }

    pub fn into_shared(self) -> Arc<dyn LogContext> {
        Arc::new(self)
    }
}

impl LogContext for Context {
    fn trace_provider(&self) -> Option<&dyn TraceProvider> {
        self.span.as_deref()
    }

    fn error_reporter(&self) -> Option<&dyn ErrorReporter> {
        self.reporter.as_deref()
    }

    fn hub_context(&self) -> Option<&dyn LogContext> {
        self.hub.as_deref().map(|hub| hub as &dyn LogContext)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("span", &self.span.as_ref().and_then(|s| s.span_ids()))
            .field("reporter", &self.reporter.is_some())
            .field("hub", &self.hub)
            .finish()
    }
}

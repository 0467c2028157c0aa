use crate::context::ErrorReporter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An error captured by [`ChannelReporter`], detached from the original
/// error object so it can cross to the background task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Messages of the `source()` chain, outermost first.
    pub sources: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut sources = Vec::new();
        let mut cur = err.source();
        while let Some(source) = cur {
            sources.push(source.to_string());
            cur = source.source();
        }
        Self {
            timestamp: Utc::now(),
            message: err.to_string(),
            sources,
        }
    }
}

/// Asynchronous destination for [`ErrorReport`]s, e.g. an error-tracking
/// service.
///
/// Called from the reporter's background task, never from the thread that
/// logged.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver a single report.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the report.
    /// - `Err(..)` otherwise. The report is dropped; there is no retry.
    async fn send(&self, report: &ErrorReport) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// A sink that simply drops all reports.
#[derive(Clone, Default)]
pub struct NoopReportSink;

#[async_trait]
impl ReportSink for NoopReportSink {
    async fn send(&self, _report: &ErrorReport) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Fire-and-forget [`ErrorReporter`] that hands captured errors to a
/// [`ReportSink`] via a bounded channel and a background task.
///
/// Capturing never blocks: when the channel is full the report is dropped
/// and counted.
pub struct ChannelReporter {
    sender: mpsc::Sender<ErrorReport>,
    /// Errors passed to `capture_exception`.
    pub total_reports: Arc<AtomicU64>,
    /// Successfully enqueued into channel.
    pub enqueued_reports: Arc<AtomicU64>,
    /// Dropped because the channel was full or closed.
    pub dropped_reports: Arc<AtomicU64>,
    /// Rejected by the sink.
    pub failed_reports: Arc<AtomicU64>,
}

impl ChannelReporter {
    /// Create a reporter and spawn the task that drains it into `sink`.
    ///
    /// Must be called inside a Tokio runtime. `buffer` is raised to at
    /// least 16.
    pub fn new(sink: Arc<dyn ReportSink>, buffer: usize) -> (Self, JoinHandle<()>) {
        let buffer = buffer.max(16);
        let (tx, mut rx) = mpsc::channel::<ErrorReport>(buffer);

        let total_reports = Arc::new(AtomicU64::new(0));
        let enqueued_reports = Arc::new(AtomicU64::new(0));
        let dropped_reports = Arc::new(AtomicU64::new(0));
        let failed_reports = Arc::new(AtomicU64::new(0));

        let failed_reports_bg = Arc::clone(&failed_reports);

        let handle = tokio::spawn(async move {
            while let Some(report) = rx.recv().await {
                if let Err(e) = sink.send(&report).await {
                    failed_reports_bg.fetch_add(1, Ordering::Relaxed);
                    eprintln!("error sending error report: {}", e);
                }
            }
        });

        (Self {
            sender: tx,
            total_reports,
            enqueued_reports,
            dropped_reports,
            failed_reports,
        }, handle)
    }
}

impl ErrorReporter for ChannelReporter {
    fn capture_exception(&self, err: &(dyn Error + Send + Sync + 'static)) {
        self.total_reports.fetch_add(1, Ordering::Relaxed);
        match self.sender.try_send(ErrorReport::from_error(err)) {
            Ok(()) => {
                self.enqueued_reports.fetch_add(1, Ordering::Relaxed);
            }
            Err(_e) => {
                self.dropped_reports.fetch_add(1, Ordering::Relaxed);
                eprintln!("error report channel full, dropping report");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(thiserror::Error, Debug)]
    #[error("query failed")]
    struct QueryFailed(#[source] std::io::Error);

    #[derive(Default)]
    struct Collect {
        reports: Mutex<Vec<ErrorReport>>,
        notify: Notify,
    }

    #[async_trait]
    impl ReportSink for Collect {
        async fn send(&self, report: &ErrorReport) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.reports.lock().unwrap().push(report.clone());
            self.notify.notify_one();
            Ok(())
        }
    }

    #[test]
    fn report_keeps_source_chain() {
        let err = QueryFailed(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));
        let report = ErrorReport::from_error(&err);
        assert_eq!(report.message, "query failed");
        assert_eq!(report.sources, vec!["broken pipe".to_string()]);
    }

    #[tokio::test]
    async fn captured_errors_reach_the_sink() {
        let sink = Arc::new(Collect::default());
        let (reporter, _handle) = ChannelReporter::new(sink.clone(), 16);

        reporter.capture_exception(&crate::report::MessageError("boom".into()));
        sink.notify.notified().await;

        let reports = sink.reports.lock().unwrap().clone();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].message, "boom");
        assert_eq!(reporter.total_reports.load(Ordering::Relaxed), 1);
        assert_eq!(reporter.enqueued_reports.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn noop_sink_accepts_everything() {
        let (reporter, _handle) = ChannelReporter::new(Arc::new(NoopReportSink), 1);
        reporter.capture_exception(&crate::report::MessageError("ignored".into()));
        assert_eq!(reporter.dropped_reports.load(Ordering::Relaxed), 0);
    }
}

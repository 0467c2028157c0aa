use std::sync::Arc;

use async_trait::async_trait;
use context_logger::reporter::{ChannelReporter, ErrorReport, ReportSink};
use context_logger::{kv, Context, JsonWriter, LogCore, Logger};
use tokio::time::{sleep, Duration};

/// Example of plugging in an error-tracking backend by implementing
/// `ReportSink`. Imagine this posts to some hosted service.
struct PrintSink;

#[async_trait]
impl ReportSink for PrintSink {
    async fn send(&self, report: &ErrorReport) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("[report-sink] {}", serde_json::to_string(report)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let (reporter, _handle) = ChannelReporter::new(Arc::new(PrintSink), 256);
    let reporter = Arc::new(reporter);

    let core = Arc::new(LogCore::new(Arc::new(JsonWriter::stdout())));
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();
    let log = core.entry(Some(ctx));

    log.info("worker started", kv!["queue", "emails"]);
    log.error("delivery failed", kv!["attempt", 3]);

    // Give background task a little time to drain the channel
    sleep(Duration::from_millis(200)).await;
}

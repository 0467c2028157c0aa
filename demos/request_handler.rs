use std::sync::Arc;

use context_logger::init::{init_logger_with_config, LoggerConfig};
use context_logger::{entry, kv, log_info, Context, ErrorReporter, Logger};

/// Reporter that prints what would be sent to an error-tracking service.
struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn capture_exception(&self, err: &(dyn std::error::Error + Send + Sync + 'static)) {
        eprintln!("[error-report] {}", err);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("payment provider rejected card")]
struct CardRejected;

fn handle_checkout(ctx: Arc<dyn context_logger::LogContext>, order_id: u64) {
    let log = entry(Some(ctx)).with_values(kv!["order_id", order_id]);

    log_info!(log, "checkout started", "items", 3);
    log.with_error(CardRejected).error("checkout failed", kv!["retryable", false]);
}

fn main() {
    if let Err(e) = init_logger_with_config(LoggerConfig::default()) {
        eprintln!("logger init failed: {e}");
        return;
    }

    let ctx = Context::new()
        .with_span_ids("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7")
        .with_reporter(Arc::new(StderrReporter))
        .into_shared();

    handle_checkout(ctx, 1001);
}

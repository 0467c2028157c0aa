use crate::context::LogContext;
use crate::fields::Fields;

/// Error raised on behalf of a log message when it is sent to the reporter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MessageError(pub String);

/// Forward a log entry to the error reporter reachable from `ctx`.
///
/// A non-empty `message` is captured as a [`MessageError`]; every error
/// value in `fields` is captured separately. Nothing happens without a
/// reporter.
pub fn report_errors(ctx: Option<&dyn LogContext>, message: &str, fields: &Fields) {
    let Some(reporter) = ctx.and_then(|ctx| ctx.error_reporter()) else {
        return;
    };

    if !message.is_empty() {
        reporter.capture_exception(&MessageError(message.to_string()));
    }

    for err in fields.values().filter_map(|value| value.as_error()) {
        reporter.capture_exception(&**err);
    }
}

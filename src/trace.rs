use crate::context::{LogContext, SpanIds};
use crate::fields::{Fields, SPAN_ID_KEY, TRACE_ID_KEY};
use crate::value::Value;

/// Find the active span reachable from `ctx`.
///
/// A hub context, if the context carries one, is consulted instead of the
/// context itself. Null ids count as no span.
pub fn extract_trace(ctx: Option<&dyn LogContext>) -> Option<SpanIds> {
    let ctx = ctx?;
    let scope = ctx.hub_context().unwrap_or(ctx);
    let ids = scope.trace_provider()?.span_ids()?;
    if ids.is_null() {
        return None;
    }
    Some(ids)
}

/// Add `traceID`/`spanID` to `fields` when a live span is reachable.
pub fn enrich(fields: &mut Fields, ctx: Option<&dyn LogContext>) {
    if let Some(ids) = extract_trace(ctx) {
        fields.insert(TRACE_ID_KEY.to_string(), Value::Str(ids.trace_id));
        fields.insert(SPAN_ID_KEY.to_string(), Value::Str(ids.span_id));
    }
}

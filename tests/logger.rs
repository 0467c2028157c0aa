mod common;

use common::{memory_core, RecordingReporter, UpstreamTimeout};
use context_logger::fields::{CALLER_KEY, ERROR_KEY, MISSING_VALUE, SPAN_ID_KEY, TRACE_ID_KEY};
use context_logger::{kv, log_error, merge_fields, Context, Level, Logger, NoopLogger, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

const TRACE: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
const SPAN: &str = "00f067aa0ba902b7";

#[test]
fn even_string_pairs_map_one_to_one() {
    let args = kv!["a", 1, "b", "two", "c", true, "d", 4.5];
    let fields = merge_fields(args);
    assert_eq!(fields.len(), args.len() / 2);
    for pair in args.chunks(2) {
        assert_eq!(fields[pair[0].as_str().unwrap()], pair[1]);
    }
}

#[test]
fn odd_length_gets_sentinel() {
    let fields = merge_fields(kv!["a", 1, "orphan"]);
    assert_eq!(fields["orphan"], Value::from(MISSING_VALUE));
}

#[test]
fn non_string_key_is_replaced_not_dropped() {
    let fields = merge_fields(kv!["a", 1, false, "value"]);
    assert_eq!(fields["invalid_key_2"], Value::from("value"));
}

#[test]
fn chaining_never_mutates_parent() {
    let (core, writer) = memory_core();
    let base = core.entry(None);
    let first = base.with_values(kv!["k", "v1"]);
    let second = first.with_values(kv!["k", "v2", "extra", 1]);

    assert!(base.fields().is_empty());
    assert_eq!(first.fields()["k"], Value::from("v1"));
    assert!(!first.fields().contains_key("extra"));
    assert_eq!(second.fields()["k"], Value::from("v2"));

    first.info("from first", &[]);
    assert_eq!(writer.last().unwrap().fields["k"], Value::from("v1"));
}

#[test]
fn zero_trace_ids_are_not_attached() {
    let (core, writer) = memory_core();
    let ctx = Context::new().with_span_ids("0".repeat(32), "0".repeat(16));
    core.entry(Some(ctx.into_shared())).info("no trace", &[]);

    let record = writer.last().unwrap();
    assert!(!record.fields.contains_key(TRACE_ID_KEY));
    assert!(!record.fields.contains_key(SPAN_ID_KEY));
}

#[test]
fn live_trace_ids_are_attached() {
    let (core, writer) = memory_core();
    let ctx = Context::new().with_span_ids(TRACE, SPAN);
    core.entry(Some(ctx.into_shared())).info("traced", &[]);

    let record = writer.last().unwrap();
    assert_eq!(record.fields[TRACE_ID_KEY], Value::from(TRACE));
    assert_eq!(record.fields[SPAN_ID_KEY], Value::from(SPAN));
}

#[test]
fn trace_ids_from_hub_context() {
    let (core, writer) = memory_core();
    let ctx = Context::new().with_hub(Context::new().with_span_ids(TRACE, SPAN));
    core.entry(Some(ctx.into_shared())).warn("via hub", &[]);

    assert_eq!(writer.last().unwrap().fields[TRACE_ID_KEY], Value::from(TRACE));
}

#[test]
fn error_reports_once_debug_never() {
    let (core, _writer) = memory_core();
    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();
    let log = core.entry(Some(ctx));

    log.debug("boom", &[]);
    log.info("boom", &[]);
    log.warn("boom", &[]);
    assert!(reporter.captured().is_empty());

    log.error("boom", &[]);
    assert_eq!(reporter.captured(), vec!["boom".to_string()]);
}

#[test]
fn with_error_then_error_reports_twice() {
    let (core, writer) = memory_core();
    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();

    core.entry(Some(ctx)).with_error(UpstreamTimeout).error("msg", &[]);

    assert_eq!(
        reporter.captured(),
        vec!["msg".to_string(), "upstream timed out".to_string()]
    );
    let record = writer.last().unwrap();
    assert!(record.fields[ERROR_KEY].as_error().is_some());
    assert_eq!(record.to_json()[ERROR_KEY], "upstream timed out");
}

#[test]
fn error_fields_passed_at_call_site_are_reported() {
    let (core, _writer) = memory_core();
    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();

    core.entry(Some(ctx)).error("", &[Value::from("cause"), Value::error(UpstreamTimeout)]);

    assert_eq!(reporter.captured(), vec!["upstream timed out".to_string()]);
}

#[test]
fn set_level_is_shared_with_later_handles() {
    let (core, writer) = memory_core();
    core.entry(None).set_level(Level::Warn);

    let other = core.entry(None);
    other.info("suppressed", &[]);
    other.warn("kept", &[]);

    let records = writer.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "kept");
    assert_eq!(core.level(), Level::Warn);
}

#[test]
fn errors_are_reported_even_below_threshold() {
    let (core, writer) = memory_core();
    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();
    let log = core.entry(Some(ctx));

    log.set_level(Level::Panic).error("quiet", &[]);

    assert!(writer.records().is_empty());
    assert_eq!(reporter.captured().len(), 1);
}

#[test]
fn caller_points_at_application_code() {
    let (core, writer) = memory_core();
    let log = core.entry(None);

    let line = line!() + 1;
    log.info("method call", &[]);
    assert_eq!(
        writer.last().unwrap().fields[CALLER_KEY],
        Value::Str(format!("logger.rs:{line} unknown"))
    );

    log_error!(log, "macro call", "attempt", 3);
    let caller = writer.last().unwrap().fields[CALLER_KEY].to_string();
    assert!(caller.starts_with("logger.rs:"), "{caller}");
    assert!(caller.ends_with(" logger::caller_points_at_application_code"), "{caller}");
}

#[test]
fn fatal_writes_then_exits() {
    let (core, writer) = memory_core();
    let reporter = Arc::new(RecordingReporter::default());
    let ctx = Context::new().with_reporter(reporter.clone()).into_shared();
    let log = core.entry(Some(ctx));

    let result = catch_unwind(AssertUnwindSafe(|| {
        log.fatal("cannot continue", kv!["code", 7]);
    }));

    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<String>().unwrap();
    assert_eq!(message, "process exit requested with code 1");

    let record = writer.last().unwrap();
    assert_eq!(record.level, Level::Fatal);
    assert_eq!(record.fields["code"], Value::from(7));
    assert_eq!(reporter.captured(), vec!["cannot continue".to_string()]);
}

#[test]
fn panic_writes_then_unwinds() {
    let (core, writer) = memory_core();
    let log = core.entry(None);

    let result = catch_unwind(AssertUnwindSafe(|| {
        log.panic("invariant broken", &[]);
    }));

    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().unwrap(), "invariant broken");
    assert_eq!(writer.last().unwrap().level, Level::Panic);
}

#[test]
fn handles_are_usable_across_threads() {
    let (core, writer) = memory_core();
    let base = core.entry(None).with_values(kv!["service", "billing"]);

    let workers: Vec<_> = (0..4usize)
        .map(|i| {
            let log = base.with_values(kv!["worker", i]);
            thread::spawn(move || {
                for n in 0..10 {
                    log.info("tick", kv!["n", n]);
                }
                log
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let log = worker.join().unwrap();
        assert_eq!(log.fields()["worker"], Value::from(i));
    }

    assert_eq!(writer.records().len(), 40);
    assert!(!base.fields().contains_key("worker"));
}

fn checkout<L: Logger>(log: &L, order_id: u64) -> L {
    let log = log.with_values(kv!["order_id", order_id]);
    log.info("checkout started", &[]);
    log
}

#[test]
fn implementations_swap_through_generics() {
    let (core, writer) = memory_core();
    let log = checkout(&core.entry(None), 7);
    assert_eq!(log.fields()["order_id"], Value::from(7u64));
    assert_eq!(writer.records().len(), 1);

    checkout(&NoopLogger, 7).warn("dropped", &[]);
    assert_eq!(writer.records().len(), 1);
}

use crate::value::Value;
use std::collections::BTreeMap;

/// Structured fields of a log record, keyed by name.
pub type Fields = BTreeMap<String, Value>;

/// Value stored for a trailing key that has no value.
pub const MISSING_VALUE: &str = "MISSING_VALUE";

/// Field holding the error passed to `with_error`.
pub const ERROR_KEY: &str = "error";
/// Field holding the resolved call site.
pub const CALLER_KEY: &str = "caller";
pub const TRACE_ID_KEY: &str = "traceID";
pub const SPAN_ID_KEY: &str = "spanID";

/// Turn a flat `key, value, key, value, ...` list into [`Fields`].
///
/// Never fails: a key that is not a string is replaced by
/// `invalid_key_<index>`, and a trailing key without a value gets
/// [`MISSING_VALUE`]. Later duplicates win.
pub fn merge_fields(pairs: &[Value]) -> Fields {
    let mut fields = Fields::new();
    merge_into(&mut fields, pairs);
    fields
}

/// Same as [`merge_fields`], but writes over an existing map.
pub fn merge_into(fields: &mut Fields, pairs: &[Value]) {
    let mut chunks = pairs.chunks_exact(2);
    for (n, pair) in chunks.by_ref().enumerate() {
        fields.insert(key_at(&pair[0], n * 2), pair[1].clone());
    }
    if let [last] = chunks.remainder() {
        fields.insert(key_at(last, pairs.len() - 1), Value::from(MISSING_VALUE));
    }
}

fn key_at(value: &Value, index: usize) -> String {
    match value.as_str() {
        Some(key) => key.to_string(),
        None => format!("invalid_key_{index}"),
    }
}

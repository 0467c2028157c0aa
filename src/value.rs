use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an error stored as a field value.
pub type SharedError = Arc<dyn Error + Send + Sync>;

/// A value attached to a log record.
///
/// Keys and values are passed to the logging methods as one flat list of
/// `Value`s, so a key position can hold something that is not a string.
/// Errors are kept as error objects (not their text) so that the error
/// reporter can pick them out of the fields later.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Json(serde_json::Value),
    Error(SharedError),
}

impl Value {
    /// Wrap an error object.
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Value::Error(Arc::new(err))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&SharedError> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    /// JSON rendering; errors become their display string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::from(*b),
            Value::I64(n) => serde_json::Value::from(*n),
            Value::U64(n) => serde_json::Value::from(*n),
            Value::F64(n) => serde_json::Value::from(*n),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Json(v) => v.clone(),
            Value::Error(err) => serde_json::Value::String(err.to_string()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::I64(n) => write!(f, "I64({n})"),
            Value::U64(n) => write!(f, "U64({n})"),
            Value::F64(n) => write!(f, "F64({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Json(v) => write!(f, "Json({v})"),
            Value::Error(err) => write!(f, "Error({err})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Error(err) => write!(f, "{err}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// Errors compare by identity, everything else by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I64(n) => serializer.serialize_i64(*n),
            Value::U64(n) => serializer.serialize_u64(*n),
            Value::F64(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Json(v) => v.serialize(serializer),
            Value::Error(err) => serializer.collect_str(err),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::I64(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::U64(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::F64(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::F64(n)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<SharedError> for Value {
    fn from(err: SharedError) -> Self {
        Value::Error(err)
    }
}

impl From<Box<dyn Error + Send + Sync>> for Value {
    fn from(err: Box<dyn Error + Send + Sync>) -> Self {
        Value::Error(Arc::from(err))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Build a key/value argument list for the logging methods.
///
/// ```
/// use context_logger::{kv, Value};
///
/// let args: &[Value] = kv!["user_id", 42, "retry", true];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! kv {
    ($($v:expr),* $(,)?) => {
        &[$($crate::Value::from($v)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(thiserror::Error, Debug)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn errors_serialize_as_their_message() {
        let v = Value::error(DiskFull);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"disk full\"");
        assert_eq!(v.to_json(), serde_json::json!("disk full"));
        assert!(v.as_error().is_some());
    }

    #[test]
    fn errors_compare_by_identity() {
        let a = Value::error(DiskFull);
        let b = Value::error(DiskFull);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from(7i32), Value::I64(7));
        assert_eq!(Value::from(7usize), Value::U64(7));
        assert_eq!(Value::from("x"), Value::Str("x".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
    }
}

//! Structured key-value fields carried by log entries
//!
//! A [`Field`] is the core logger's native attribute. Values keep their
//! original shape until an encoder renders them.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Value type for structured logging fields
#[derive(Debug, Clone)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Ordered nested fields, rendered as a JSON object
    Object(Vec<Field>),
    /// Arbitrary serialized structure
    Json(serde_json::Value),
    Error(Arc<dyn StdError + Send + Sync>),
    Null,
}

impl FieldValue {
    /// Wrap any error, keeping the original value reachable through `source()`
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        FieldValue::Error(Arc::new(err))
    }

    /// Convert to serde_json::Value for JSON serialization
    ///
    /// Durations are written as fractional seconds, timestamps with the
    /// supplied formatter, errors as their display text.
    #[must_use]
    pub fn to_json_value(&self, time_fmt: &dyn Fn(&DateTime<Utc>) -> String) -> serde_json::Value {
        use serde_json::Value;
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Uint(u) => Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string())),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Duration(d) => serde_json::Number::from_f64(d.as_secs_f64())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Time(t) => Value::String(time_fmt(t)),
            FieldValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|f| (f.key.clone(), f.value.to_json_value(time_fmt)))
                    .collect(),
            ),
            FieldValue::Json(v) => v.clone(),
            FieldValue::Error(e) => Value::String(e.to_string()),
            FieldValue::Null => Value::Null,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::Uint(a), FieldValue::Uint(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Duration(a), FieldValue::Duration(b)) => a == b,
            (FieldValue::Time(a), FieldValue::Time(b)) => a == b,
            (FieldValue::Object(a), FieldValue::Object(b)) => a == b,
            (FieldValue::Json(a), FieldValue::Json(b)) => a == b,
            // Errors carry no equality; identical messages are treated as equal
            (FieldValue::Error(a), FieldValue::Error(b)) => a.to_string() == b.to_string(),
            (FieldValue::Null, FieldValue::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Time(t) => write!(f, "{}", t.to_rfc3339()),
            FieldValue::Object(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "}}")
            }
            FieldValue::Json(v) => write!(f, "{}", v),
            FieldValue::Error(e) => write!(f, "{}", e),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Time(t)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

/// A single structured field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Append `"key":value` to a JSON object under construction
///
/// The object must already hold its opening brace. Keys are never merged, so
/// a repeated key is written twice and every value reaches the output.
pub(crate) fn push_json_pair(out: &mut String, key: &str, value: &serde_json::Value) {
    if !out.ends_with('{') {
        out.push(',');
    }
    out.push_str(&serde_json::Value::String(key.to_string()).to_string());
    out.push(':');
    out.push_str(&value.to_string());
}

/// Render fields as one JSON object, in order and with repeated keys kept
pub(crate) fn fields_to_json_object(
    fields: &[Field],
    time_fmt: &dyn Fn(&DateTime<Utc>) -> String,
) -> String {
    let mut out = String::from("{");
    for field in fields {
        push_json_pair(&mut out, &field.key, &field.value.to_json_value(time_fmt));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc3339(t: &DateTime<Utc>) -> String {
        t.to_rfc3339()
    }

    #[derive(Debug)]
    struct DiskFull;

    impl fmt::Display for DiskFull {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "no space left on device")
        }
    }

    impl StdError for DiskFull {}

    #[test]
    fn test_field_creation() {
        let field = Field::new("user_id", 123);
        assert_eq!(field.key, "user_id");
        assert_eq!(field.value, FieldValue::Int(123));
        assert_eq!(field.to_string(), "user_id=123");
    }

    #[test]
    fn test_nested_object_to_json() {
        let value = FieldValue::Object(vec![
            Field::new("method", "GET"),
            Field::new("status", 200u32),
        ]);
        let json = value.to_json_value(&rfc3339);
        assert_eq!(json, serde_json::json!({"method": "GET", "status": 200}));
    }

    #[test]
    fn test_error_keeps_source_type() {
        let value = FieldValue::error(DiskFull);
        match &value {
            FieldValue::Error(e) => assert!(e.downcast_ref::<DiskFull>().is_some()),
            other => panic!("expected error value, got {:?}", other),
        }
        assert_eq!(
            value.to_json_value(&rfc3339),
            serde_json::Value::String("no space left on device".into())
        );
    }

    #[test]
    fn test_non_finite_float_is_stringified() {
        let json = FieldValue::Float(f64::NAN).to_json_value(&rfc3339);
        assert_eq!(json, serde_json::Value::String("NaN".into()));
    }

    #[test]
    fn test_duration_as_seconds() {
        let json = FieldValue::Duration(Duration::from_millis(1500)).to_json_value(&rfc3339);
        assert_eq!(json, serde_json::json!(1.5));
    }

    #[test]
    fn test_fields_object_preserves_order() {
        let fields = vec![
            Field::new("zeta", 1),
            Field::new("alpha", 2),
            Field::new("mid", 3),
        ];
        let object = fields_to_json_object(&fields, &rfc3339);
        assert_eq!(object, r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_fields_object_keeps_repeated_keys() {
        let fields = vec![Field::new("a", 1), Field::new("a", 2)];
        assert_eq!(fields_to_json_object(&fields, &rfc3339), r#"{"a":1,"a":2}"#);
    }

    #[test]
    fn test_keys_are_escaped() {
        let object = fields_to_json_object(&[Field::new("we\"ird", "v")], &rfc3339);
        let parsed: serde_json::Value = serde_json::from_str(&object).unwrap();
        assert_eq!(parsed["we\"ird"], "v");
    }
}

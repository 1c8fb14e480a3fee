//! Structured key/value fields attached to log records.
//!
//! Values are stored as [`serde_json::Value`] so every encoder can render them
//! without knowing where they came from.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single structured field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Field {
    Field::new(key, Value::String(value.into()))
}

pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Field {
    Field::new(key, value)
}

pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Field {
    Field::new(key, value)
}

/// Non-finite floats have no JSON representation and are recorded as strings.
pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Field {
    match serde_json::Number::from_f64(value) {
        Some(n) => Field::new(key, Value::Number(n)),
        None => Field::new(key, Value::String(value.to_string())),
    }
}

pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Field {
    Field::new(key, value)
}

/// Duration in seconds, as a float.
pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Field {
    float(key, value.as_secs_f64())
}

/// The error's display text under the key `"error"`.
pub fn error(err: &dyn std::error::Error) -> Field {
    Field::new("error", Value::String(err.to_string()))
}

pub fn debug(key: impl Into<Cow<'static, str>>, value: &dyn fmt::Debug) -> Field {
    Field::new(key, Value::String(format!("{value:?}")))
}

/// Any serializable value. If serialization fails the field is replaced by
/// `<key>Error` holding the failure text.
pub fn any<T: Serialize + ?Sized>(key: impl Into<Cow<'static, str>>, value: &T) -> Field {
    let key = key.into();
    match serde_json::to_value(value) {
        Ok(v) => Field { key, value: v },
        Err(e) => Field::new(format!("{key}Error"), Value::String(e.to_string())),
    }
}

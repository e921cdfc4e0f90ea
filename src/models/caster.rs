//! Coercion facade
//!
//! A `Caster` is what `Cache::cast` and `Queue::cast` hand back: the value
//! that was read (or nothing) plus typed accessors. Strict accessors report a
//! `CacheError::Cast`; the `*_or` accessors fall back to a default instead.

use crate::error::{CacheError, Result};
use crate::models::Value;

// == Caster ==
/// Wraps an optional value read from a cache or queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Caster {
    value: Option<Value>,
}

impl Caster {
    pub fn new(value: Option<Value>) -> Self {
        Self { value }
    }

    /// Returns true when nothing was stored under the key.
    pub fn is_nil(&self) -> bool {
        self.value.is_none()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    // == Strict Accessors ==
    pub fn to_string_value(&self) -> Result<String> {
        self.convert("string", Value::coerce_string)
    }

    pub fn to_i64(&self) -> Result<i64> {
        self.convert("i64", Value::coerce_i64)
    }

    pub fn to_f64(&self) -> Result<f64> {
        self.convert("f64", Value::coerce_f64)
    }

    pub fn to_bool(&self) -> Result<bool> {
        self.convert("bool", Value::coerce_bool)
    }

    // == Safe Accessors ==
    pub fn string_or(&self, default: &str) -> String {
        self.to_string_value()
            .unwrap_or_else(|_| default.to_string())
    }

    pub fn i64_or(&self, default: i64) -> i64 {
        self.to_i64().unwrap_or(default)
    }

    pub fn f64_or(&self, default: f64) -> f64 {
        self.to_f64().unwrap_or(default)
    }

    pub fn bool_or(&self, default: bool) -> bool {
        self.to_bool().unwrap_or(default)
    }

    fn convert<T>(&self, to: &'static str, f: impl Fn(&Value) -> Option<T>) -> Result<T> {
        match &self.value {
            Some(value) => f(value).ok_or(CacheError::Cast {
                from: value.type_name(),
                to,
            }),
            None => Err(CacheError::Cast { from: "nil", to }),
        }
    }
}

impl From<Option<Value>> for Caster {
    fn from(value: Option<Value>) -> Self {
        Self::new(value)
    }
}

//! Stored value model
//!
//! Cache entries hold a `Value`, a tagged union over the scalar types a
//! caller may store. Numeric arithmetic and the `Caster` facade are built on
//! the coercion helpers defined here.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Value ==
/// A value stored in a cache entry or queue.
///
/// Serializes untagged, so `Value::Int(3)` is the JSON number `3` and
/// `Value::String("a")` is the JSON string `"a"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }

    // == Integer Coercion ==
    /// Reads the value as an integer.
    ///
    /// Floats truncate toward zero, booleans read as 0/1 and text is parsed
    /// after trimming (a float literal is accepted and truncated).
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) => float_to_i64(*f),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => parse_i64(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_i64),
        }
    }

    // == Float Coercion ==
    /// Reads the value as a finite float.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => f.is_finite().then_some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => parse_f64(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_f64),
        }
    }

    // == Bool Coercion ==
    /// Reads the value as a boolean. Numbers are `true` when non-zero.
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            Value::Float(f) => (!f.is_nan()).then_some(*f != 0.0),
            Value::String(s) => parse_bool(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_bool),
        }
    }

    // == String Coercion ==
    /// Renders the value as text. Fails only for bytes that are not UTF-8.
    pub fn coerce_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Bytes(b) => String::from_utf8(b.clone()).ok(),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

// == Parsing Helpers ==
fn float_to_i64(f: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds
    f.is_finite().then(|| f.trunc() as i64)
}

fn parse_i64(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// == Conversions ==
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

//! # Scalar values
//!
//! [`Value`] is the single scalar type flowing through the index machinery: class-index keys,
//! sort keys, fill values of masked columns and the payload of opaque fields are all expressed
//! with it.
//!
//! Floating-point values are wrapped in [`OrderedFloat`] so that a [`Value`] is `Eq + Hash + Ord`
//! and can be used directly as a hash-map key by the index builder. Values of different variants
//! order by variant first; in practice a column only ever produces one variant.
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A single scalar element of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

impl Value {
    /// Build a float value.
    pub fn float(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }

    /// Return the value as `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.0),
            _ => None,
        }
    }

    /// Return the value as a string slice when it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for a floating-point NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float(f) if f.0.is_nan())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", x.0),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

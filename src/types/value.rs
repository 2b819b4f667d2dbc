//! Typed cell values

use super::data_type::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of values in a table
pub type Row = Vec<Value>;

/// A dynamically typed scalar cell value.
///
/// Equality and hashing are structural; cross-type comparison semantics
/// (numeric widening, text fallback) live in [`super::evaluator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    I64(i64),
    F64(f64),
    Str(String),
}

impl Value {
    /// Create an I64 value
    pub fn integer(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create an F64 value
    pub fn float(f: f64) -> Self {
        Value::F64(f)
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The declared type this value belongs to; null belongs to none.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::I64(_) => Some(DataType::I64),
            Value::F64(_) => Some(DataType::F64),
            Value::Str(_) => Some(DataType::Str),
        }
    }
}

/// Canonical text form. Doubles as the CSV serialization: null is the
/// empty field, everything else prints its natural form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0.hash(state),
            Value::I64(i) => i.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl Eq for Value {}

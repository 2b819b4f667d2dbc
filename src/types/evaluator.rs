//! Value comparison semantics
//!
//! The single source of truth for how values compare across types. Both
//! predicate evaluation and hash-join key canonicalization go through
//! this module, so the two can never disagree.

use super::value::Value;
use std::cmp::Ordering;

/// Compare two values under the engine's coercion rules.
///
/// Returns `None` when either side is null; a null comparison never
/// holds. Integers and doubles compare numerically by widening to f64.
/// Any other cross-type pair falls back to comparing canonical text
/// forms.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
        (Value::F64(a), Value::F64(b)) => a.partial_cmp(b),
        (Value::I64(a), Value::F64(b)) => (*a as f64).partial_cmp(b),
        (Value::F64(a), Value::I64(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (a, b) => Some(a.to_string().cmp(&b.to_string())),
    }
}

/// Equality under the same rules; null is never equal to anything.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    compare(left, right) == Some(Ordering::Equal)
}

/// Canonical hash key for join bucketing.
///
/// Keys that are equal under [`compare`] must land in the same bucket,
/// so integers and doubles both key on the widened f64 bit pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Number(u64),
    Text(String),
}

/// The bucket key for a value, or `None` for null: null keys never join.
pub fn join_key(value: &Value) -> Option<JoinKey> {
    match value {
        Value::Null => None,
        Value::I64(i) => Some(JoinKey::Number(canonical_bits(*i as f64))),
        Value::F64(f) => Some(JoinKey::Number(canonical_bits(*f))),
        Value::Str(s) => Some(JoinKey::Text(s.clone())),
    }
}

// -0.0 and 0.0 are numerically equal but differ in bits; fold them.
fn canonical_bits(f: f64) -> u64 {
    if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }
}

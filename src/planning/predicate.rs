//! Row and join predicates

use crate::error::Error;
use crate::types::{Tuple, Value, evaluator};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// One side of a comparison: a name resolved against the row schema at
/// evaluation time, or a parsed literal.
///
/// A name that does not resolve to a column is read as a bare string
/// literal; that is how unquoted text literals reach the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Name(String),
    Literal(Value),
}

impl Operand {
    fn resolve<'a>(&'a self, tuple: &'a Tuple) -> Cow<'a, Value> {
        match self {
            Operand::Name(name) if tuple.schema().has_column(name) => Cow::Borrowed(tuple.get(name)),
            Operand::Name(name) => Cow::Owned(Value::string(name.clone())),
            Operand::Literal(value) => Cow::Borrowed(value),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(name) => write!(f, "{}", name),
            Operand::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// Comparison operators for row predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl CompareOp {
    fn matches(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOp::Eq => ordering == Equal,
            CompareOp::NotEq => ordering != Equal,
            CompareOp::Gt => ordering == Greater,
            CompareOp::GtEq => ordering != Less,
            CompareOp::Lt => ordering == Less,
            CompareOp::LtEq => ordering != Greater,
        }
    }
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::GtEq),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::LtEq),
            other => Err(Error::ParseError(format!(
                "unknown comparison operator: {other}"
            ))),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// A pure row predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    /// Evaluates the predicate against one row. Comparisons touching
    /// null are false; conjunctions short-circuit.
    pub fn evaluate(&self, tuple: &Tuple) -> bool {
        match self {
            Predicate::Compare { left, op, right } => {
                trace!(predicate = %self, "evaluating predicate");
                let lhs = left.resolve(tuple);
                let rhs = right.resolve(tuple);
                match evaluator::compare(&lhs, &rhs) {
                    Some(ordering) => op.matches(ordering),
                    None => false,
                }
            }
            Predicate::And(left, right) => left.evaluate(tuple) && right.evaluate(tuple),
        }
    }

    /// Every name the predicate mentions. Whether a name is a column or
    /// a bare literal is only decided at evaluation time, so pushdown
    /// treats them all as column requirements.
    pub fn referenced_names(&self) -> HashSet<&str> {
        let mut names = HashSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut HashSet<&'a str>) {
        match self {
            Predicate::Compare { left, right, .. } => {
                for operand in [left, right] {
                    if let Operand::Name(name) = operand {
                        names.insert(name.as_str());
                    }
                }
            }
            Predicate::And(left, right) => {
                left.collect_names(names);
                right.collect_names(names);
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Predicate::And(left, right) => write!(f, "{} AND {}", left, right),
        }
    }
}

/// Equality between one column of the left input and one column of the
/// right input. The only join predicate the engine supports; other
/// kinds are reserved.
#[derive(Clone, Debug, PartialEq)]
pub enum JoinPredicate {
    Equality { left: String, right: String },
}

impl JoinPredicate {
    pub fn equality(left: impl Into<String>, right: impl Into<String>) -> Self {
        JoinPredicate::Equality {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left_column(&self) -> &str {
        let JoinPredicate::Equality { left, .. } = self;
        left
    }

    pub fn right_column(&self) -> &str {
        let JoinPredicate::Equality { right, .. } = self;
        right
    }

    /// True when the pair of rows satisfies the equality. Null keys
    /// never join.
    pub fn evaluate(&self, left: &Tuple, right: &Tuple) -> bool {
        let JoinPredicate::Equality { left: l, right: r } = self;
        evaluator::values_equal(left.get(l), right.get(r))
    }

    /// The predicate with its sides exchanged, for join-order swaps.
    pub fn swapped(&self) -> JoinPredicate {
        let JoinPredicate::Equality { left, right } = self;
        JoinPredicate::Equality {
            left: right.clone(),
            right: left.clone(),
        }
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let JoinPredicate::Equality { left, right } = self;
        write!(f, "{} = {}", left, right)
    }
}

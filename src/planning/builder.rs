//! Fluent plan construction
//!
//! Builds operator trees bottom-up from scans. Predicate text uses the
//! grammar `<operand> <op> <operand>` with whitespace-separated tokens;
//! literals parse as integer when integral, double when numeric, and
//! otherwise stay names (column references or bare string literals).

use super::plan::Node;
use super::predicate::{JoinPredicate, Operand, Predicate};
use crate::error::{Error, Result};
use crate::types::Value;

/// Builder for one plan subtree.
#[derive(Clone, Debug)]
pub struct PlanBuilder {
    node: Node,
}

impl PlanBuilder {
    /// Starts a plan from a CSV table scan.
    pub fn scan(path: impl Into<String>) -> Self {
        PlanBuilder {
            node: Node::Scan { path: path.into() },
        }
    }

    /// Keeps rows satisfying the predicate text, e.g. `"age > 30"`.
    pub fn filter(self, predicate: &str) -> Result<Self> {
        let predicate = parse_predicate(predicate)?;
        Ok(PlanBuilder {
            node: Node::Filter {
                source: Box::new(self.node),
                predicate,
            },
        })
    }

    /// Joins with another subtree on an equality like `"id = cid"`; the
    /// left column must come from this side, the right column from
    /// `other`.
    pub fn join(self, other: PlanBuilder, predicate: &str) -> Result<Self> {
        let predicate = parse_join_predicate(predicate)?;
        Ok(PlanBuilder {
            node: Node::HashJoin {
                left: Box::new(self.node),
                right: Box::new(other.node),
                predicate,
            },
        })
    }

    /// Projects the named columns in order.
    pub fn project<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_inner(columns, false)
    }

    /// Projects the named columns and drops duplicate rows, keeping
    /// first-seen order.
    pub fn project_distinct<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_inner(columns, true)
    }

    fn project_inner<I, S>(self, columns: I, distinct: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlanBuilder {
            node: Node::Project {
                source: Box::new(self.node),
                columns: columns.into_iter().map(Into::into).collect(),
                distinct,
            },
        }
    }

    /// Terminates the plan with a CSV output file.
    pub fn sink(self, path: impl Into<String>) -> Self {
        PlanBuilder {
            node: Node::Sink {
                source: Box::new(self.node),
                path: path.into(),
            },
        }
    }

    pub fn build(self) -> Node {
        self.node
    }
}

fn split_tokens(text: &str) -> Result<(&str, &str, &str)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens[..] {
        [left, op, right] => Ok((left, op, right)),
        _ => Err(Error::ParseError(format!(
            "expected `<operand> <op> <operand>`, got `{text}`"
        ))),
    }
}

fn parse_operand(token: &str) -> Operand {
    if let Ok(i) = token.parse::<i64>() {
        Operand::Literal(Value::I64(i))
    } else if let Ok(f) = token.parse::<f64>() {
        Operand::Literal(Value::F64(f))
    } else {
        Operand::Name(token.to_string())
    }
}

fn parse_predicate(text: &str) -> Result<Predicate> {
    let (left, op, right) = split_tokens(text)?;
    Ok(Predicate::Compare {
        left: parse_operand(left),
        op: op.parse()?,
        right: parse_operand(right),
    })
}

fn parse_join_predicate(text: &str) -> Result<JoinPredicate> {
    let (left, op, right) = split_tokens(text)?;
    if op != "=" {
        return Err(Error::ParseError(format!(
            "join predicates must be equalities, got `{text}`"
        )));
    }
    match (parse_operand(left), parse_operand(right)) {
        (Operand::Name(left), Operand::Name(right)) => Ok(JoinPredicate::Equality { left, right }),
        _ => Err(Error::ParseError(format!(
            "join predicates must compare two columns, got `{text}`"
        ))),
    }
}

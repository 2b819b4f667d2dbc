//! Pull-based physical operators
//!
//! Execution follows the classical iterator model: the consumer opens
//! the root, repeatedly pulls rows with `next` until the stream ends,
//! then closes. Everything is single-threaded and synchronous; an
//! operator owns its children and its state exclusively.

mod executor;
mod filter;
mod join;
mod project;
mod scan;
mod sink;

pub use executor::execute;
pub use filter::FilterOperator;
pub use join::HashJoinOperator;
pub use project::ProjectOperator;
pub use scan::ScanOperator;
pub use sink::SinkOperator;

use crate::error::{Error, Result};
use crate::planning::plan::Node;
use crate::types::{Schema, Tuple};
use std::sync::Arc;

/// The pull protocol every physical operator implements.
///
/// `open` acquires resources and propagates to children; `next` returns
/// the next row in output order, or `None` once the stream is exhausted
/// (and keeps returning `None` afterwards); `close` releases resources
/// and propagates to children. Calling `next` outside the open state is
/// a contract violation and reported as an internal error.
pub trait Operator {
    fn open(&mut self) -> Result<()>;
    fn next(&mut self) -> Result<Option<Tuple>>;
    fn close(&mut self) -> Result<()>;

    /// The operator's output schema; available once open.
    fn schema(&self) -> Result<&Arc<Schema>>;
}

/// Lifecycle state shared by the operators to police the pull protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Open,
    Closed,
}

impl Lifecycle {
    fn check_open(self, operator: &str) -> Result<()> {
        match self {
            Lifecycle::Open => Ok(()),
            Lifecycle::Created => Err(Error::Internal(format!(
                "{operator}: next called before open"
            ))),
            Lifecycle::Closed => Err(Error::Internal(format!(
                "{operator}: next called after close"
            ))),
        }
    }
}

fn schema_ref<'a>(schema: &'a Option<Arc<Schema>>, operator: &str) -> Result<&'a Arc<Schema>> {
    schema
        .as_ref()
        .ok_or_else(|| Error::Internal(format!("{operator}: schema requested before open")))
}

/// Instantiates the physical operator tree for a plan. The plan is pure
/// data and stays reusable; every call builds fresh operator state.
pub fn compile(plan: &Node) -> Box<dyn Operator> {
    match plan {
        Node::Scan { path } => Box::new(ScanOperator::new(path.clone())),
        Node::Filter { source, predicate } => {
            Box::new(FilterOperator::new(compile(source), predicate.clone()))
        }
        Node::Project {
            source,
            columns,
            distinct,
        } => Box::new(ProjectOperator::new(
            compile(source),
            columns.clone(),
            *distinct,
        )),
        Node::HashJoin {
            left,
            right,
            predicate,
        } => Box::new(HashJoinOperator::new(
            compile(left),
            compile(right),
            predicate.clone(),
        )),
        Node::Sink { source, path } => Box::new(SinkOperator::new(compile(source), path.clone())),
    }
}

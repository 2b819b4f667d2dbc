//! Row filtering

use super::{Lifecycle, Operator};
use crate::error::Result;
use crate::planning::predicate::Predicate;
use crate::types::{Schema, Tuple};
use std::sync::Arc;
use tracing::trace;

/// Forwards the rows that satisfy the predicate, preserving the child's
/// order and schema.
pub struct FilterOperator {
    child: Box<dyn Operator>,
    predicate: Predicate,
    state: Lifecycle,
}

impl FilterOperator {
    pub fn new(child: Box<dyn Operator>, predicate: Predicate) -> Self {
        FilterOperator {
            child,
            predicate,
            state: Lifecycle::Created,
        }
    }
}

impl Operator for FilterOperator {
    fn open(&mut self) -> Result<()> {
        trace!(operator = "filter", predicate = %self.predicate, "open");
        self.child.open()?;
        self.state = Lifecycle::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        trace!(operator = "filter", "next");
        self.state.check_open("filter")?;
        while let Some(tuple) = self.child.next()? {
            if self.predicate.evaluate(&tuple) {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        trace!(operator = "filter", "close");
        debug_assert!(self.state != Lifecycle::Closed, "filter closed twice");
        self.state = Lifecycle::Closed;
        self.child.close()
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        self.child.schema()
    }
}

//! Column projection

use super::{Lifecycle, Operator, schema_ref};
use crate::error::Result;
use crate::types::{Column, DataType, Row, Schema, Tuple};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Produces rows holding the named columns in order, looked up by name
/// from the child row. Names missing from the child schema surface as
/// null (typed as string in the output). With `distinct` set, an exact
/// set of already-emitted rows suppresses duplicates; the first
/// occurrence wins.
pub struct ProjectOperator {
    child: Box<dyn Operator>,
    columns: Vec<String>,
    distinct: bool,
    seen: HashSet<Row>,
    schema: Option<Arc<Schema>>,
    state: Lifecycle,
}

impl ProjectOperator {
    pub fn new(child: Box<dyn Operator>, columns: Vec<String>, distinct: bool) -> Self {
        ProjectOperator {
            child,
            columns,
            distinct,
            seen: HashSet::new(),
            schema: None,
            state: Lifecycle::Created,
        }
    }
}

impl Operator for ProjectOperator {
    fn open(&mut self) -> Result<()> {
        trace!(operator = "project", columns = ?self.columns, "open");
        self.child.open()?;
        let input = self.child.schema()?;
        let columns = self
            .columns
            .iter()
            .map(|name| {
                let data_type = input.column_type(name).unwrap_or(DataType::Str);
                Column::new(name.clone(), data_type)
            })
            .collect();
        self.schema = Some(Arc::new(Schema::new(columns)?));
        self.state = Lifecycle::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        trace!(operator = "project", "next");
        self.state.check_open("project")?;
        let schema = schema_ref(&self.schema, "project")?.clone();
        while let Some(tuple) = self.child.next()? {
            let values: Row = self
                .columns
                .iter()
                .map(|name| tuple.get(name).clone())
                .collect();
            if self.distinct && !self.seen.insert(values.clone()) {
                continue;
            }
            return Ok(Some(Tuple::new(values, schema)));
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        trace!(operator = "project", "close");
        debug_assert!(self.state != Lifecycle::Closed, "project closed twice");
        self.seen.clear();
        self.state = Lifecycle::Closed;
        self.child.close()
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        schema_ref(&self.schema, "project")
    }
}

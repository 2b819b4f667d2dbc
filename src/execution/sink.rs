//! CSV sink

use super::{Lifecycle, Operator, schema_ref};
use crate::error::Result;
use crate::storage::csv::CsvWriter;
use crate::types::{Schema, Tuple};
use std::sync::Arc;
use tracing::trace;

/// Writes the child's rows to an output CSV file. The executor drives
/// the pull loop through the sink: each `next` pulls one child row,
/// writes it, and forwards it upward. `open` creates the file and writes
/// the header; `close` flushes even when the stream was abandoned
/// mid-way.
pub struct SinkOperator {
    child: Box<dyn Operator>,
    path: String,
    writer: Option<CsvWriter>,
    schema: Option<Arc<Schema>>,
    state: Lifecycle,
}

impl SinkOperator {
    pub fn new(child: Box<dyn Operator>, path: impl Into<String>) -> Self {
        SinkOperator {
            child,
            path: path.into(),
            writer: None,
            schema: None,
            state: Lifecycle::Created,
        }
    }
}

impl Operator for SinkOperator {
    fn open(&mut self) -> Result<()> {
        trace!(operator = "sink", path = %self.path, "open");
        self.child.open()?;
        let schema = self.child.schema()?.clone();
        self.writer = Some(CsvWriter::create(&self.path, &schema)?);
        self.schema = Some(schema);
        self.state = Lifecycle::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        trace!(operator = "sink", "next");
        self.state.check_open("sink")?;
        match self.child.next()? {
            Some(tuple) => {
                if let Some(writer) = self.writer.as_mut() {
                    writer.write_row(tuple.values())?;
                }
                Ok(Some(tuple))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<()> {
        trace!(operator = "sink", path = %self.path, "close");
        debug_assert!(self.state != Lifecycle::Closed, "sink closed twice");
        self.state = Lifecycle::Closed;
        let flushed = match self.writer.take() {
            Some(mut writer) => writer.finish(),
            None => Ok(()),
        };
        let child = self.child.close();
        flushed?;
        child
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        schema_ref(&self.schema, "sink")
    }
}

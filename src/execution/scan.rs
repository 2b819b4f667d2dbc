//! CSV table scan

use super::{Lifecycle, Operator, schema_ref};
use crate::error::{Error, Result};
use crate::storage::csv::CsvReader;
use crate::types::{Schema, Tuple};
use std::sync::Arc;
use tracing::trace;

/// Leaf operator streaming one CSV table in file order.
pub struct ScanOperator {
    path: String,
    reader: Option<CsvReader>,
    schema: Option<Arc<Schema>>,
    state: Lifecycle,
}

impl ScanOperator {
    pub fn new(path: impl Into<String>) -> Self {
        ScanOperator {
            path: path.into(),
            reader: None,
            schema: None,
            state: Lifecycle::Created,
        }
    }
}

impl Operator for ScanOperator {
    fn open(&mut self) -> Result<()> {
        trace!(operator = "scan", path = %self.path, "open");
        let reader = CsvReader::open(&self.path)?;
        self.schema = Some(reader.schema().clone());
        self.reader = Some(reader);
        self.state = Lifecycle::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        trace!(operator = "scan", "next");
        self.state.check_open("scan")?;
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Err(Error::Internal("scan has no open reader".into())),
        };
        match reader.next_row()? {
            Some(values) => Ok(Some(Tuple::new(values, reader.schema().clone()))),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<()> {
        trace!(operator = "scan", "close");
        debug_assert!(self.state != Lifecycle::Closed, "scan closed twice");
        // Dropping the reader releases the file handle.
        self.reader = None;
        self.state = Lifecycle::Closed;
        Ok(())
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        schema_ref(&self.schema, "scan")
    }
}

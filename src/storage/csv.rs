//! Minimal CSV access
//!
//! Row 1 is the schema header (`name:type` fields); data rows are plain
//! comma-separated text with no quoting or escaping. Empty fields are
//! null, and so are cells that fail to parse as their declared type.

use crate::error::{Error, Result};
use crate::types::{DataType, Row, Schema, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// Streaming reader over one CSV table.
pub struct CsvReader {
    reader: BufReader<File>,
    schema: Arc<Schema>,
    line: String,
}

impl CsvReader {
    /// Opens the file and parses the schema header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(Error::InvalidHeader(format!(
                "{}: missing schema header",
                path.display()
            )));
        }
        let schema = Schema::from_header(trim_line(&header))?;
        trace!(path = %path.display(), schema = %schema, "opened csv table");
        Ok(CsvReader {
            reader,
            schema: Arc::new(schema),
            line: String::new(),
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The next data row parsed into typed values, or `None` at end of
    /// file. A field count that disagrees with the schema is fatal.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        let line = trim_line(&self.line);
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != self.schema.len() {
            return Err(Error::RowArity {
                expected: self.schema.len(),
                found: fields.len(),
            });
        }
        let row = fields
            .iter()
            .zip(self.schema.columns())
            .map(|(field, column)| parse_cell(field, column.data_type))
            .collect();
        Ok(Some(row))
    }
}

/// Writer producing one CSV output file. The header carries column names
/// only; declared types are not written back.
pub struct CsvWriter {
    writer: BufWriter<File>,
}

impl CsvWriter {
    /// Creates the file and writes the header line.
    pub fn create(path: impl AsRef<Path>, schema: &Schema) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let header: Vec<&str> = schema.names().collect();
        writeln!(writer, "{}", header.join(","))?;
        trace!(path = %path.display(), "created csv output");
        Ok(CsvWriter { writer })
    }

    pub fn write_row(&mut self, row: &[Value]) -> Result<()> {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ",")?;
            }
            write!(self.writer, "{}", value)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Parse one cell into its declared type; empty or unparseable cells
/// yield null.
pub fn parse_cell(field: &str, data_type: DataType) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    match data_type {
        DataType::I64 => field.parse().map(Value::I64).unwrap_or(Value::Null),
        DataType::F64 => field.parse().map(Value::F64).unwrap_or(Value::Null),
        DataType::Str => Value::Str(field.to_string()),
    }
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

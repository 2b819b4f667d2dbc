//! Table schemas parsed from CSV headers
//!
//! The first row of every CSV file declares its schema as `name:type`
//! fields. Column names are expected to be unique across all input
//! tables; this module only enforces uniqueness within one schema.

use super::data_type::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single column: name and declared type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered sequence of columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate column names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Schema { columns })
    }

    /// Parses a CSV header row of `name:type` fields.
    pub fn from_header(line: &str) -> Result<Self> {
        let columns = line
            .split(',')
            .map(|field| {
                let (name, type_keyword) = field
                    .split_once(':')
                    .ok_or_else(|| Error::InvalidHeader(field.to_string()))?;
                if name.is_empty() {
                    return Err(Error::InvalidHeader(field.to_string()));
                }
                Ok(Column::new(name, type_keyword.parse()?))
            })
            .collect::<Result<Vec<_>>>()?;
        Schema::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The named column's declared type, if present.
    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.column_index(name).map(|i| self.columns[i].data_type)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// This schema followed by `other`, as produced by a join.
    pub fn concat(&self, other: &Schema) -> Result<Schema> {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Schema::new(columns)
    }
}

// Formats the schema in its header form.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", column.name, column.data_type)?;
        }
        Ok(())
    }
}

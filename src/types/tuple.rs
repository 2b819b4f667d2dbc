//! Rows paired with the schema that describes them

use super::schema::Schema;
use super::value::{Row, Value};
use std::sync::Arc;

const NULL: &Value = &Value::Null;

/// An ordered row of values carrying a reference to its schema.
///
/// Invariant: the value count equals the schema arity. Operators uphold
/// this by construction; the CSV reader checks it with a real error.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    values: Row,
    schema: Arc<Schema>,
}

impl Tuple {
    pub fn new(values: Row, schema: Arc<Schema>) -> Self {
        debug_assert_eq!(
            values.len(),
            schema.len(),
            "tuple arity does not match schema {}",
            schema
        );
        Tuple { values, schema }
    }

    /// Value of the named column. Unknown names read as null.
    pub fn get(&self, column: &str) -> &Value {
        match self.schema.column_index(column) {
            Some(i) => &self.values[i],
            None => NULL,
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Row {
        self.values
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

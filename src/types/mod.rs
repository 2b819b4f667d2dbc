//! The engine data model: column types, values, schemas and rows.

pub mod data_type;
pub mod evaluator;
pub mod schema;
pub mod tuple;
pub mod value;

pub use data_type::DataType;
pub use schema::{Column, Schema};
pub use tuple::Tuple;
pub use value::{Row, Value};

//! Error types for the query engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Schema errors
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Malformed header field: {0}")]
    InvalidHeader(String),

    #[error("Unknown column type: {0}")]
    UnknownType(String),

    // Data errors
    #[error("Row has {found} fields, schema has {expected}")]
    RowArity { expected: usize, found: usize },

    // Plan construction errors
    #[error("Parse error: {0}")]
    ParseError(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // System errors
    #[error("Internal error: {0}")]
    Internal(String),
}

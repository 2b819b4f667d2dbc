//! Column data types

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The scalar types a CSV column can declare in its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer, declared as `integer`
    I64,
    /// 64-bit float, declared as `double`
    F64,
    /// UTF-8 text, declared as `string`
    Str,
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "integer" => Ok(DataType::I64),
            "double" => Ok(DataType::F64),
            "string" => Ok(DataType::Str),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::I64 => write!(f, "integer"),
            DataType::F64 => write!(f, "double"),
            DataType::Str => write!(f, "string"),
        }
    }
}

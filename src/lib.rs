//! An in-memory analytical query engine over CSV tables.
//!
//! Plans are trees of relational operators built with [`PlanBuilder`],
//! optionally rewritten by the rule-and-cost [`Optimizer`] against a
//! statistics [`Catalog`], and executed by a single-threaded pull loop
//! that streams rows from CSV scans to a CSV sink.

pub mod catalog;
pub mod error;
pub mod execution;
pub mod planning;
pub mod storage;
pub mod types;

pub use catalog::{Catalog, TableStatistics, collect_statistics};
pub use error::{Error, Result};
pub use execution::{Operator, compile, execute};
pub use planning::builder::PlanBuilder;
pub use planning::optimizer::Optimizer;
pub use planning::plan::Node;
pub use types::{DataType, Row, Schema, Tuple, Value};

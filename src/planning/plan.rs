//! Query plan trees
//!
//! A plan is pure data: a tree of relational operator nodes owned
//! strictly by their parents. Building and rewriting plans never touches
//! the input files, so the same plan can be compiled and executed any
//! number of times.

use super::predicate::{JoinPredicate, Predicate};
use crate::catalog::Catalog;
use std::collections::HashSet;
use std::fmt;

/// A node in the operator tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Stream a CSV table
    Scan { path: String },

    /// Keep rows satisfying the predicate
    Filter {
        source: Box<Node>,
        predicate: Predicate,
    },

    /// Reorder and restrict columns, optionally deduplicating
    Project {
        source: Box<Node>,
        columns: Vec<String>,
        distinct: bool,
    },

    /// Equi-join; the left side is built into the hash table
    HashJoin {
        left: Box<Node>,
        right: Box<Node>,
        predicate: JoinPredicate,
    },

    /// Write rows to an output CSV file
    Sink { source: Box<Node>, path: String },
}

impl Node {
    /// Column names this node produces, resolving scans through the
    /// catalog. `None` when an unregistered scan makes the output
    /// unknown.
    pub fn output_columns(&self, catalog: &Catalog) -> Option<HashSet<String>> {
        match self {
            Node::Scan { path } => catalog
                .table_statistics(path)
                .map(|stats| stats.schema.names().map(str::to_string).collect()),
            Node::Filter { source, .. } => source.output_columns(catalog),
            Node::Project { columns, .. } => Some(columns.iter().cloned().collect()),
            Node::HashJoin { left, right, .. } => {
                let mut columns = left.output_columns(catalog)?;
                columns.extend(right.output_columns(catalog)?);
                Some(columns)
            }
            Node::Sink { source, .. } => source.output_columns(catalog),
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match self {
            Node::Scan { path } => writeln!(f, "Scan [{}]", path),
            Node::Filter { source, predicate } => {
                writeln!(f, "Filter [{}]", predicate)?;
                source.fmt_indent(f, depth + 1)
            }
            Node::Project {
                source,
                columns,
                distinct,
            } => {
                let flag = if *distinct { " (distinct)" } else { "" };
                writeln!(f, "Project [{}]{}", columns.join(", "), flag)?;
                source.fmt_indent(f, depth + 1)
            }
            Node::HashJoin {
                left,
                right,
                predicate,
            } => {
                writeln!(f, "HashJoin [{}]", predicate)?;
                left.fmt_indent(f, depth + 1)?;
                right.fmt_indent(f, depth + 1)
            }
            Node::Sink { source, path } => {
                writeln!(f, "Sink [{}]", path)?;
                source.fmt_indent(f, depth + 1)
            }
        }
    }
}

// Renders the plan as an indented tree, roots first.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::builder::PlanBuilder;

    #[test]
    fn test_plan_display() {
        let plan = PlanBuilder::scan("customers.csv")
            .filter("age > 30")
            .unwrap()
            .project(["name"])
            .sink("out.csv")
            .build();

        assert_eq!(
            plan.to_string(),
            "Sink [out.csv]\n\
             \x20 Project [name]\n\
             \x20   Filter [age > 30]\n\
             \x20     Scan [customers.csv]\n"
        );
    }

    #[test]
    fn test_output_columns_unknown_scan() {
        let catalog = Catalog::new();
        let plan = PlanBuilder::scan("missing.csv").build();
        assert_eq!(plan.output_columns(&catalog), None);

        // A projection caps the outputs regardless of what lies below.
        let plan = PlanBuilder::scan("missing.csv").project(["name"]).build();
        let columns = plan.output_columns(&catalog).unwrap();
        assert_eq!(columns, HashSet::from(["name".to_string()]));
    }
}

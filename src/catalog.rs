//! Table statistics for the optimizer
//!
//! Statistics are collected once per input file before optimization and
//! never change afterwards. The optimizer reads them to estimate
//! cardinalities; execution never touches them.

use crate::error::Result;
use crate::storage::csv::CsvReader;
use crate::types::{DataType, Schema, Value, evaluator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const HISTOGRAM_BUCKETS: usize = 10;

/// Column-level statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Declared type of the column
    pub data_type: DataType,
    /// Minimum non-null value, if any
    pub min: Option<Value>,
    /// Maximum non-null value, if any
    pub max: Option<Value>,
    /// Exact number of distinct non-null values
    pub distinct_count: usize,
    /// Number of null cells
    pub null_count: usize,
    /// Equi-width bucket counts for numeric columns
    pub histogram: Option<Histogram>,
}

/// Equi-width histogram over a numeric column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bucket boundaries; `frequencies.len() + 1` entries
    pub boundaries: Vec<f64>,
    /// Count of values in each bucket
    pub frequencies: Vec<u64>,
}

impl Histogram {
    /// Builds an equi-width histogram; `None` when the column has no
    /// spread to bucket.
    fn build(values: &[f64]) -> Option<Self> {
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        if min >= max {
            return None;
        }
        let width = (max - min) / HISTOGRAM_BUCKETS as f64;
        let boundaries: Vec<f64> = (0..=HISTOGRAM_BUCKETS)
            .map(|i| min + width * i as f64)
            .collect();
        let mut frequencies = vec![0u64; HISTOGRAM_BUCKETS];
        for &value in values {
            let bucket = (((value - min) / width) as usize).min(HISTOGRAM_BUCKETS - 1);
            frequencies[bucket] += 1;
        }
        Some(Histogram {
            boundaries,
            frequencies,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.frequencies.len()
    }
}

/// Statistics for one table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableStatistics {
    /// Number of data rows
    pub row_count: u64,
    /// The table's parsed schema
    pub schema: Schema,
    /// Column statistics by column name
    pub columns: HashMap<String, ColumnStatistics>,
}

impl TableStatistics {
    pub fn new(schema: Schema, row_count: u64) -> Self {
        TableStatistics {
            row_count,
            schema,
            columns: HashMap::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.get(name)
    }
}

/// Statistics for every registered table, keyed by source path.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableStatistics>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_statistics(&self, path: &str) -> Option<&TableStatistics> {
        self.tables.get(path)
    }

    /// Registers or replaces statistics for a table.
    pub fn insert(&mut self, path: impl Into<String>, statistics: TableStatistics) {
        self.tables.insert(path.into(), statistics);
    }
}

/// Reads a CSV file once and registers its statistics: row count and,
/// per column, min/max, exact distinct count, null count, and an
/// equi-width histogram for numeric columns. Idempotent: re-collecting a
/// path replaces its entry.
pub fn collect_statistics(path: &str, catalog: &mut Catalog) -> Result<()> {
    let mut reader = CsvReader::open(path)?;
    let schema = reader.schema().clone();

    let mut row_count = 0u64;
    let mut mins: Vec<Option<Value>> = vec![None; schema.len()];
    let mut maxs: Vec<Option<Value>> = vec![None; schema.len()];
    let mut distinct: Vec<HashSet<Value>> = vec![HashSet::new(); schema.len()];
    let mut null_counts = vec![0usize; schema.len()];
    let mut numeric: Vec<Vec<f64>> = vec![Vec::new(); schema.len()];

    while let Some(row) = reader.next_row()? {
        row_count += 1;
        for (i, value) in row.into_iter().enumerate() {
            if value.is_null() {
                null_counts[i] += 1;
                continue;
            }
            match &value {
                Value::I64(v) => numeric[i].push(*v as f64),
                Value::F64(v) => numeric[i].push(*v),
                _ => {}
            }
            if mins[i]
                .as_ref()
                .is_none_or(|min| evaluator::compare(&value, min) == Some(Ordering::Less))
            {
                mins[i] = Some(value.clone());
            }
            if maxs[i]
                .as_ref()
                .is_none_or(|max| evaluator::compare(&value, max) == Some(Ordering::Greater))
            {
                maxs[i] = Some(value.clone());
            }
            distinct[i].insert(value);
        }
    }

    let mut statistics = TableStatistics::new((*schema).clone(), row_count);
    for (i, column) in schema.columns().iter().enumerate() {
        statistics.columns.insert(
            column.name.clone(),
            ColumnStatistics {
                data_type: column.data_type,
                min: mins[i].take(),
                max: maxs[i].take(),
                distinct_count: distinct[i].len(),
                null_count: null_counts[i],
                histogram: Histogram::build(&numeric[i]),
            },
        );
    }

    debug!(path, rows = row_count, "collected table statistics");
    catalog.insert(path, statistics);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_collect_statistics() {
        let file = write_file(
            "id:integer,name:string,age:integer\n1,Ann,25\n2,Bob,40\n3,Ann,\n4,Cal,35\n",
        );
        let path = file.path().to_string_lossy().into_owned();

        let mut catalog = Catalog::new();
        collect_statistics(&path, &mut catalog).unwrap();

        let stats = catalog.table_statistics(&path).unwrap();
        assert_eq!(stats.row_count, 4);

        let id = stats.column("id").unwrap();
        assert_eq!(id.min, Some(Value::integer(1)));
        assert_eq!(id.max, Some(Value::integer(4)));
        assert_eq!(id.distinct_count, 4);

        let name = stats.column("name").unwrap();
        assert_eq!(name.distinct_count, 3);
        assert_eq!(name.min, Some(Value::string("Ann")));
        assert_eq!(name.max, Some(Value::string("Cal")));
        assert!(name.histogram.is_none());

        let age = stats.column("age").unwrap();
        assert_eq!(age.null_count, 1);
        assert_eq!(age.distinct_count, 3);
        let histogram = age.histogram.as_ref().unwrap();
        assert_eq!(histogram.bucket_count(), 10);
        assert_eq!(histogram.frequencies.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_recollection_is_idempotent() {
        let file = write_file("id:integer\n1\n2\n");
        let path = file.path().to_string_lossy().into_owned();

        let mut catalog = Catalog::new();
        collect_statistics(&path, &mut catalog).unwrap();
        let first = catalog.table_statistics(&path).unwrap().clone();
        collect_statistics(&path, &mut catalog).unwrap();
        assert_eq!(catalog.table_statistics(&path), Some(&first));
    }

    #[test]
    fn test_constant_column_has_no_histogram() {
        let file = write_file("n:integer\n7\n7\n7\n");
        let path = file.path().to_string_lossy().into_owned();

        let mut catalog = Catalog::new();
        collect_statistics(&path, &mut catalog).unwrap();
        let stats = catalog.table_statistics(&path).unwrap();
        let n = stats.column("n").unwrap();
        assert_eq!(n.distinct_count, 1);
        assert!(n.histogram.is_none());
    }
}

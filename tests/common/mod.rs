//! Shared fixtures for end-to-end query tests
#![allow(dead_code)]

use quarry::{Catalog, collect_statistics};
use std::fs;
use tempfile::TempDir;

/// Test context holding a scratch directory for input and output tables
/// plus a statistics catalog.
pub struct TestContext {
    dir: TempDir,
    pub catalog: Catalog,
}

impl TestContext {
    pub fn new() -> Self {
        TestContext {
            dir: tempfile::tempdir().unwrap(),
            catalog: Catalog::new(),
        }
    }

    /// Writes a CSV table into the scratch directory and returns its path.
    pub fn write_table(&self, name: &str, contents: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    /// Writes a table and registers its statistics in the catalog.
    pub fn load_table(&mut self, name: &str, contents: &str) -> String {
        let path = self.write_table(name, contents);
        collect_statistics(&path, &mut self.catalog).unwrap();
        path
    }

    /// A path inside the scratch directory for an output file.
    pub fn output_path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    /// Reads an output file back as (header, data rows).
    pub fn read_output(&self, path: &str) -> (String, Vec<String>) {
        let text = fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap_or_default().to_string();
        (header, lines.map(str::to_string).collect())
    }

    /// Data rows of an output file, sorted for multiset comparison.
    pub fn read_output_sorted(&self, path: &str) -> Vec<String> {
        let (_, mut rows) = self.read_output(path);
        rows.sort();
        rows
    }
}

pub const CUSTOMERS: &str = "id:integer,name:string,age:integer\n1,Ann,25\n2,Bob,40\n3,Cal,35\n";
pub const ORDERS: &str = "oid:integer,cid:integer\n10,2\n11,3\n12,9\n";

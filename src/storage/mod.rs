//! File-backed table access.

pub mod csv;

//! Interleave DDL CLI library
//!
//! File loading and output formatting for the `interleave-ddl` binary.
//! The binary (main.rs) uses this library.

pub mod schema_file;

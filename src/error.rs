//! Error types for schema planning
//!
//! Structural problems (a missing interleave parent, a cycle, a table without a
//! primary key) are detected before any statement is produced and surface as
//! [`DdlError`]. Problems reading the live catalog are [`CatalogError`]s and are
//! absorbed by the index tracker, which degrades to best-effort answers.

use thiserror::Error;

/// Errors raised while ordering tables or building DDL statements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DdlError {
    /// A table is interleaved in a parent that is not part of the namespace
    #[error("Parent table {parent} of table {child} not found")]
    MissingParentTable { child: String, parent: String },

    /// Following interleave parents from this table never reaches a root
    #[error("Interleave hierarchy of table {table} contains a cycle")]
    CyclicInterleaveGraph { table: String },

    /// The target database requires a primary key on every table
    #[error("Table {table} does not specify a primary key")]
    MissingPrimaryKey { table: String },

    /// The generic CREATE TABLE text could not be rewritten
    #[error("Cannot rewrite CREATE TABLE statement for table {table}: {reason}")]
    MalformedCreateStatement { table: String, reason: String },

    /// Two tables in one namespace share a name (compared case-insensitively)
    #[error("Table {table} is defined more than once")]
    DuplicateTable { table: String },

    /// A table was looked up by a name the namespace does not contain
    #[error("Table {table} is not part of the namespace")]
    UnknownTable { table: String },

    /// A key or index references a column the table does not declare
    #[error("Table {table} has no column named {column}")]
    UnknownColumn { table: String, column: String },
}

/// Errors raised by a [`Catalog`](crate::catalog::Catalog) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No catalog connection is available for this operation
    #[error("Live catalog is not available")]
    Unavailable,

    /// The metadata query itself failed
    #[error("Catalog query failed: {0}")]
    Query(String),
}

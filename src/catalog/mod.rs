//! Live catalog access
//!
//! The planner only needs two facts from a live database: which tables exist
//! and which indexes exist (with their columns). [`Catalog`] is the narrow seam
//! a driver implements; [`StaticCatalog`] is an in-memory snapshot.

pub mod tracker;

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

pub use tracker::{LiveIndexTracker, UniqueIndex};

/// One `(index, table, column)` row of live index metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub index_name: String,
    pub table_name: String,
    pub column_name: String,
    #[serde(default = "default_unique")]
    pub unique: bool,
}

fn default_unique() -> bool {
    true
}

/// Trait for reading live schema metadata
///
/// Implementations are expected to be called at most once per schema operation;
/// [`LiveIndexTracker`] caches the results.
pub trait Catalog {
    /// Names of all tables in the target namespace
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the metadata cannot be read.
    fn tables(&self) -> Result<Vec<String>, CatalogError>;

    /// One row per indexed column for every index in the target namespace
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the metadata cannot be read.
    fn index_columns(&self) -> Result<Vec<IndexColumn>, CatalogError>;
}

/// In-memory catalog snapshot
///
/// Deserializes from JSON:
///
/// ```json
/// {
///   "tables": ["Singers"],
///   "indexes": [
///     { "index_name": "UQ_Email", "table_name": "Singers", "column_name": "Email" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<IndexColumn>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.tables.push(name.into());
        self
    }

    /// Add an index with one row per column
    pub fn with_index(mut self, name: &str, table: &str, columns: &[&str], unique: bool) -> Self {
        for column in columns {
            self.indexes.push(IndexColumn {
                index_name: name.to_string(),
                table_name: table.to_string(),
                column_name: (*column).to_string(),
                unique,
            });
        }
        self
    }
}

impl Catalog for StaticCatalog {
    fn tables(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.tables.clone())
    }

    fn index_columns(&self) -> Result<Vec<IndexColumn>, CatalogError> {
        Ok(self.indexes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_from_json() {
        let catalog = StaticCatalog::from_json(
            r#"{
                "tables": ["Singers"],
                "indexes": [
                    { "index_name": "UQ_Email", "table_name": "Singers", "column_name": "Email" },
                    { "index_name": "IDX_Name", "table_name": "Singers", "column_name": "Name", "unique": false }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.tables().unwrap(), vec!["Singers".to_string()]);
        let rows = catalog.index_columns().unwrap();
        assert!(rows[0].unique);
        assert!(!rows[1].unique);
    }

    #[test]
    fn test_with_index_adds_one_row_per_column() {
        let catalog = StaticCatalog::new().with_index("UQ_xy", "T", &["x", "y"], true);
        assert_eq!(catalog.indexes.len(), 2);
        assert_eq!(catalog.indexes[1].column_name, "y");
    }
}

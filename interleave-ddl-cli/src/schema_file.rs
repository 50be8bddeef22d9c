//! Schema description and catalog snapshot files
//!
//! A schema file is TOML with one `[[tables]]` entry per table (see
//! [`interleave_ddl::schema`] for the fields). A catalog snapshot is the JSON
//! form of [`StaticCatalog`].

use anyhow::{Context, Result};
use interleave_ddl::{Namespace, StaticCatalog};
use std::fs;
use std::path::Path;

/// Load a namespace from a TOML schema description
pub fn load_namespace(path: &Path) -> Result<Namespace> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let namespace = parse_namespace(&content)
        .with_context(|| format!("Invalid schema file {}", path.display()))?;
    log::debug!(
        "Loaded {} table(s) from {}",
        namespace.tables.len(),
        path.display()
    );
    Ok(namespace)
}

pub fn parse_namespace(content: &str) -> Result<Namespace> {
    Ok(toml::from_str(content)?)
}

/// Load a live catalog snapshot from JSON
pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog snapshot {}", path.display()))?;
    let catalog = StaticCatalog::from_json(&content)
        .with_context(|| format!("Invalid catalog snapshot {}", path.display()))?;
    log::debug!(
        "Catalog snapshot {}: {} table(s), {} index column(s)",
        path.display(),
        catalog.tables.len(),
        catalog.indexes.len()
    );
    Ok(catalog)
}

/// One statement per line, each terminated by `;`
pub fn format_statements(statements: &[String]) -> String {
    statements
        .iter()
        .map(|statement| format!("{statement};\n"))
        .collect()
}

//! Live index tracking for idempotent unique-key statements
//!
//! Schema-change statements are slow to fail on the target, so before adding or
//! dropping a unique index the planner asks whether an equivalent index already
//! exists. Constraint names are not stable across create/alter cycles, so
//! equivalence is the column set on the same table, never the name.
//!
//! A tracker is scoped to exactly one schema operation: it reads the catalog on
//! first use, caches the snapshot, and is dropped when the operation ends.
//!
//! When the catalog cannot be read the tracker degrades instead of failing:
//!
//! | catalog state        | unique key | table / index by name |
//! |----------------------|------------|-----------------------|
//! | no catalog attached  | unknown    | absent                |
//! | query failed         | unknown    | present               |
//!
//! "Unknown" lets the caller attempt the statement and leaves error reporting to
//! the execution layer.

use super::{Catalog, IndexColumn};
use crate::error::CatalogError;
use crate::schema::ident::{name_key, same_name};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A unique index reconstructed from live metadata
///
/// Two values are equal when they cover the same column set on the same table;
/// the name is informational only.
#[derive(Debug, Clone, Eq)]
pub struct UniqueIndex {
    pub name: String,
    pub table_name: String,
    /// Column names, ASCII upper-cased
    pub column_names: BTreeSet<String>,
}

impl UniqueIndex {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, table_name: impl Into<String>, columns: &[S]) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            column_names: column_set(columns),
        }
    }

    fn matches(&self, table: &str, columns: &BTreeSet<String>) -> bool {
        same_name(&self.table_name, table) && self.column_names == *columns
    }
}

impl PartialEq for UniqueIndex {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.table_name, &other.column_names)
    }
}

/// Answer to "does an equivalent unique index exist"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Present(UniqueIndex),
    Absent,
    /// Live metadata could not be read
    Unknown,
}

#[derive(Debug, Default)]
struct LiveSchema {
    tables: HashSet<String>,
    index_names: HashSet<String>,
    unique: HashMap<String, UniqueIndex>,
}

impl LiveSchema {
    fn add_indexed_column(&mut self, row: IndexColumn) {
        self.index_names.insert(name_key(&row.index_name));
        if !row.unique {
            return;
        }
        let key = format!("{}.{}", name_key(&row.table_name), name_key(&row.index_name));
        let index = self.unique.entry(key).or_insert_with(|| UniqueIndex {
            name: row.index_name.clone(),
            table_name: row.table_name.clone(),
            column_names: BTreeSet::new(),
        });
        index.column_names.insert(name_key(&row.column_name));
    }
}

#[derive(Debug)]
enum LiveState {
    Detached,
    Failed,
    Loaded(LiveSchema),
}

/// Operation-scoped cache of live table and index metadata
pub struct LiveIndexTracker<'c> {
    catalog: Option<&'c dyn Catalog>,
    state: Option<LiveState>,
}

impl<'c> LiveIndexTracker<'c> {
    /// Track indexes of a live catalog; nothing is read until first use
    pub fn new(catalog: &'c dyn Catalog) -> Self {
        Self {
            catalog: Some(catalog),
            state: None,
        }
    }

    /// A tracker with no catalog connection
    pub fn detached() -> Self {
        Self {
            catalog: None,
            state: None,
        }
    }

    /// Whether live metadata was read successfully
    pub fn is_available(&mut self) -> bool {
        matches!(self.state(), LiveState::Loaded(_))
    }

    /// Find a live unique index on `table` covering exactly `columns`
    ///
    /// Column names are compared case-insensitively and order does not matter.
    /// Partial and superset matches are not equivalent.
    pub fn exists<S: AsRef<str>>(&mut self, columns: &[S], table: &str) -> Option<UniqueIndex> {
        match self.probe(columns, table) {
            Existence::Present(index) => Some(index),
            Existence::Absent | Existence::Unknown => None,
        }
    }

    /// Like [`exists`](Self::exists) but distinguishes "absent" from "unknown"
    pub fn probe<S: AsRef<str>>(&mut self, columns: &[S], table: &str) -> Existence {
        let wanted = column_set(columns);
        match self.state() {
            LiveState::Loaded(schema) => schema
                .unique
                .values()
                .find(|idx| idx.matches(table, &wanted))
                .cloned()
                .map_or(Existence::Absent, Existence::Present),
            LiveState::Detached | LiveState::Failed => Existence::Unknown,
        }
    }

    /// Remove an index from the known set after a drop has been planned
    pub fn forget(&mut self, index: &UniqueIndex) {
        if let LiveState::Loaded(schema) = self.state() {
            let key = format!("{}.{}", name_key(&index.table_name), name_key(&index.name));
            schema.unique.remove(&key);
            schema.index_names.remove(&name_key(&index.name));
        }
    }

    /// Whether a table exists live
    pub fn table_exists(&mut self, table: &str) -> bool {
        match self.state() {
            LiveState::Loaded(schema) => schema.tables.contains(&name_key(table)),
            LiveState::Detached => false,
            LiveState::Failed => true,
        }
    }

    /// Whether an index with this name exists live
    pub fn index_exists(&mut self, name: &str) -> bool {
        match self.state() {
            LiveState::Loaded(schema) => schema.index_names.contains(&name_key(name)),
            LiveState::Detached => false,
            LiveState::Failed => true,
        }
    }

    fn state(&mut self) -> &mut LiveState {
        let catalog = self.catalog;
        self.state.get_or_insert_with(|| load(catalog))
    }
}

fn load(catalog: Option<&dyn Catalog>) -> LiveState {
    let Some(catalog) = catalog else {
        log::warn!("No live catalog attached; index existence checks are skipped");
        return LiveState::Detached;
    };

    let snapshot = catalog
        .tables()
        .and_then(|tables| catalog.index_columns().map(|rows| (tables, rows)));
    match snapshot {
        Ok((tables, rows)) => {
            let mut schema = LiveSchema {
                tables: tables.iter().map(|t| name_key(t)).collect(),
                ..LiveSchema::default()
            };
            for row in rows {
                schema.add_indexed_column(row);
            }
            log::debug!(
                "Loaded live catalog: {} tables, {} unique indexes",
                schema.tables.len(),
                schema.unique.len()
            );
            LiveState::Loaded(schema)
        }
        Err(CatalogError::Unavailable) => {
            log::warn!("Live catalog unavailable; index existence checks are skipped");
            LiveState::Detached
        }
        Err(err) => {
            log::warn!("Unable to read index metadata, assuming objects exist: {err}");
            LiveState::Failed
        }
    }
}

fn column_set<S: AsRef<str>>(columns: &[S]) -> BTreeSet<String> {
    columns.iter().map(|c| name_key(c.as_ref())).collect()
}

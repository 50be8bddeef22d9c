//! Schema model consumed by the planner
//!
//! These are read-only snapshots supplied per schema operation. The planner
//! never mutates them; ordering and rendering always produce new values.
//!
//! The types deserialize from a simple description format so that callers can
//! keep their schema in a file:
//!
//! ```toml
//! [[tables]]
//! name = "Singers"
//! columns = [
//!     { name = "SingerId", type = "INT64", nullable = false, primary_key = true },
//!     { name = "Email", type = "STRING(MAX)", unique = true },
//! ]
//!
//! [[tables]]
//! name = "Albums"
//! interleave = { parent = "Singers", cascade_delete = true }
//! columns = [
//!     { name = "AlbumId", type = "INT64", nullable = false, primary_key = true },
//!     { name = "SingerId", type = "INT64", nullable = false, primary_key = true },
//! ]
//! ```

pub mod ident;

use crate::batch::AuxiliaryObject;
use serde::{Deserialize, Serialize};

pub use ident::{quote, same_name, unique_key_name};

fn default_nullable() -> bool {
    true
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Dialect type name, e.g. `INT64` or `STRING(MAX)`
    #[serde(rename = "type", default)]
    pub sql_type: Option<String>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether the column participates in the primary key
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the column carries a single-column unique constraint
    #[serde(default)]
    pub unique: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: Some(sql_type.into()),
            nullable: true,
            primary_key: false,
            unique: false,
        }
    }

    /// Mark the column as part of the primary key (key columns are never nullable)
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Declares that a table's rows are physically stored with their parent row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterleaveSpec {
    #[serde(rename = "parent")]
    pub parent_table: String,
    /// Append `ON DELETE CASCADE` to the INTERLEAVE clause
    #[serde(default)]
    pub cascade_delete: bool,
}

impl InterleaveSpec {
    pub fn new(parent_table: impl Into<String>) -> Self {
        Self {
            parent_table: parent_table.into(),
            cascade_delete: false,
        }
    }

    pub fn cascade_delete(mut self) -> Self {
        self.cascade_delete = true;
        self
    }
}

/// A named secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

/// A named (possibly multi-column) unique constraint, realized as a unique index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    pub name: String,
    pub columns: Vec<String>,
}

impl UniqueKey {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A mapped table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub interleave: Option<InterleaveSpec>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub unique_keys: Vec<UniqueKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            interleave: None,
            indexes: Vec::new(),
            unique_keys: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn interleave_in(mut self, spec: InterleaveSpec) -> Self {
        self.interleave = Some(spec);
        self
    }

    pub fn index<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes.push(Index {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn unique_key(mut self, key: UniqueKey) -> Self {
        self.unique_keys.push(key);
        self
    }

    /// Primary key columns in declaration order
    pub fn primary_key(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// Look up a column by name, ignoring case
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| same_name(&c.name, name))
    }

    /// Unique keys declared on the table plus one generated key per `unique` column
    pub fn all_unique_keys(&self) -> Vec<UniqueKey> {
        let mut keys = self.unique_keys.clone();
        for column in self.columns.iter().filter(|c| c.unique) {
            keys.push(UniqueKey::new(
                unique_key_name(&self.name, &column.name),
                [column.name.clone()],
            ));
        }
        keys
    }
}

/// All tables of one schema operation plus auxiliary objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Extra objects emitted around the tables; batch markers are added by the tool
    #[serde(skip)]
    pub auxiliary_objects: Vec<AuxiliaryObject>,
}

impl Namespace {
    pub fn new(tables: Vec<Table>) -> Self {
        Self {
            tables,
            auxiliary_objects: Vec::new(),
        }
    }

    pub fn with_auxiliary(mut self, object: AuxiliaryObject) -> Self {
        self.auxiliary_objects.push(object);
        self
    }

    /// Look up a table by name, ignoring case
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| same_name(&t.name, name))
    }
}

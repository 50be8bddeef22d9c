//! Primary key column ordering for interleaved tables
//!
//! An interleaved table's key must start with its parent's key, in the parent's
//! key order, all the way up the chain. Getting this wrong is only reported by
//! the database when the DDL runs, so the order is computed here explicitly:
//!
//! 1. key columns whose name also appears in the parent's ordered key, in that order
//! 2. key columns that exist in the parent table but not in its key
//! 3. key columns that only exist in this table
//!
//! Within groups 2 and 3 the declared order is kept. Non-key columns follow the
//! key columns in declaration order.

use super::graph::InterleaveGraph;
use crate::error::DdlError;
use crate::schema::{same_name, Column, InterleaveSpec, Table};

/// A table together with its interleave-consistent column order
///
/// This is a pure view over the input snapshot; the table itself is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTable<'a> {
    pub table: &'a Table,
    pub parent: Option<&'a Table>,
    /// Primary key columns, parent-shared columns first
    pub primary_key: Vec<&'a Column>,
    /// Primary key columns followed by the remaining columns in declaration order
    pub columns: Vec<&'a Column>,
}

impl<'a> OrderedTable<'a> {
    pub fn name(&self) -> &'a str {
        &self.table.name
    }

    pub fn interleave(&self) -> Option<&'a InterleaveSpec> {
        self.table.interleave.as_ref()
    }

    pub fn primary_key_names(&self) -> Vec<&'a str> {
        self.primary_key.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Computes [`OrderedTable`] views against one interleave graph
pub struct ColumnOrderer<'g, 'a> {
    graph: &'g InterleaveGraph<'a>,
}

impl<'g, 'a> ColumnOrderer<'g, 'a> {
    pub fn new(graph: &'g InterleaveGraph<'a>) -> Self {
        Self { graph }
    }

    /// Order a table of the graph by name
    ///
    /// # Errors
    ///
    /// - [`DdlError::UnknownTable`] if the graph has no table with this name
    /// - [`DdlError::CyclicInterleaveGraph`] if the parent chain loops
    pub fn order_table(&self, name: &str) -> Result<OrderedTable<'a>, DdlError> {
        self.ordered_table(self.index_of(name)?)
    }

    /// Primary key columns of a table, parent-shared columns first
    ///
    /// # Errors
    ///
    /// Same as [`order_table`](Self::order_table).
    pub fn order_primary_key(&self, name: &str) -> Result<Vec<&'a Column>, DdlError> {
        self.order_primary_key_columns(self.index_of(name)?)
    }

    fn index_of(&self, name: &str) -> Result<usize, DdlError> {
        self.graph.position(name).ok_or_else(|| DdlError::UnknownTable {
            table: name.to_string(),
        })
    }

    /// Order the table at declaration index `idx`
    pub(crate) fn ordered_table(&self, idx: usize) -> Result<OrderedTable<'a>, DdlError> {
        let table = &self.graph.tables()[idx];
        let primary_key = self.order_primary_key_columns(idx)?;
        let columns = primary_key
            .iter()
            .copied()
            .chain(table.columns.iter().filter(|c| !c.primary_key))
            .collect();
        Ok(OrderedTable {
            table,
            parent: self.graph.parent_table(idx),
            primary_key,
            columns,
        })
    }

    /// Order the primary key columns of the table at declaration index `idx`
    pub(crate) fn order_primary_key_columns(&self, idx: usize) -> Result<Vec<&'a Column>, DdlError> {
        self.order_at_depth(idx, 0)
    }

    fn order_at_depth(&self, idx: usize, depth: usize) -> Result<Vec<&'a Column>, DdlError> {
        let table = &self.graph.tables()[idx];
        if depth > self.graph.len() {
            return Err(DdlError::CyclicInterleaveGraph {
                table: table.name.clone(),
            });
        }

        let mut key = table.primary_key();
        let Some(parent_idx) = self.graph.parent_of(idx) else {
            return Ok(key);
        };
        let parent = &self.graph.tables()[parent_idx];
        let parent_key = self.order_at_depth(parent_idx, depth + 1)?;

        // Stable sort: ties keep declaration order.
        key.sort_by_key(|column| {
            match parent_key.iter().position(|p| same_name(&p.name, &column.name)) {
                Some(pos) => (0, pos),
                None if parent.find_column(&column.name).is_some() => (1, 0),
                None => (2, 0),
            }
        });
        Ok(key)
    }
}

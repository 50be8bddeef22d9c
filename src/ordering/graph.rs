//! Interleave dependency graph
//!
//! Each table has at most one interleave parent, so the graph is stored as a
//! child-to-parent adjacency (`parents[i]`) plus the inverse child lists used by
//! the topological sort. Table positions are declaration indexes into the
//! namespace's table list.

use crate::error::DdlError;
use crate::schema::ident::name_key;
use crate::schema::Table;
use std::collections::HashMap;

/// Validated parent/child relationships for one namespace
#[derive(Debug, Clone)]
pub struct InterleaveGraph<'a> {
    tables: &'a [Table],
    positions: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl<'a> InterleaveGraph<'a> {
    /// Build the graph, checking that every referenced parent exists
    ///
    /// # Errors
    ///
    /// - [`DdlError::DuplicateTable`] if two tables share a name
    /// - [`DdlError::MissingParentTable`] if a parent is not in `tables`
    /// - [`DdlError::CyclicInterleaveGraph`] if any ancestor walk loops
    pub fn build(tables: &'a [Table]) -> Result<Self, DdlError> {
        let mut positions = HashMap::with_capacity(tables.len());
        for (idx, table) in tables.iter().enumerate() {
            if positions.insert(name_key(&table.name), idx).is_some() {
                return Err(DdlError::DuplicateTable {
                    table: table.name.clone(),
                });
            }
        }

        let mut parents = vec![None; tables.len()];
        let mut children = vec![Vec::new(); tables.len()];
        for (idx, table) in tables.iter().enumerate() {
            if let Some(spec) = &table.interleave {
                let parent = *positions.get(&name_key(&spec.parent_table)).ok_or_else(|| {
                    DdlError::MissingParentTable {
                        child: table.name.clone(),
                        parent: spec.parent_table.clone(),
                    }
                })?;
                parents[idx] = Some(parent);
                children[parent].push(idx);
            }
        }

        let graph = Self {
            tables,
            positions,
            parents,
            children,
        };
        for idx in 0..tables.len() {
            graph.ancestors(idx)?;
        }
        Ok(graph)
    }

    pub fn tables(&self) -> &'a [Table] {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Declaration index of a table, ignoring case
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&name_key(name)).copied()
    }

    /// Declaration index of the parent; `None` for roots and out-of-range indexes
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.parents.get(idx).copied().flatten()
    }

    pub fn parent_table(&self, idx: usize) -> Option<&'a Table> {
        self.parent_of(idx).map(|p| &self.tables[p])
    }

    pub fn children_of(&self, idx: usize) -> &[usize] {
        self.children.get(idx).map_or(&[], Vec::as_slice)
    }

    /// Ancestors of a table, nearest first
    ///
    /// The walk is bounded by the number of tables; exceeding the bound means
    /// the parent chain loops.
    pub fn ancestors(&self, idx: usize) -> Result<Vec<usize>, DdlError> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(idx);
        while let Some(parent) = current {
            if chain.len() >= self.tables.len() {
                return Err(DdlError::CyclicInterleaveGraph {
                    table: self.tables[idx].name.clone(),
                });
            }
            chain.push(parent);
            current = self.parent_of(parent);
        }
        Ok(chain)
    }

    /// Whether `ancestor` appears anywhere in the parent chain of `descendant`
    pub fn is_ancestor_of(&self, ancestor: usize, descendant: usize) -> Result<bool, DdlError> {
        Ok(self.ancestors(descendant)?.contains(&ancestor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InterleaveSpec;

    fn table(name: &str, parent: Option<&str>) -> Table {
        let table = Table::new(name);
        match parent {
            Some(p) => table.interleave_in(InterleaveSpec::new(p)),
            None => table,
        }
    }

    #[test]
    fn test_build_links_children_to_parents() {
        let tables = vec![
            table("Singers", None),
            table("Albums", Some("singers")),
            table("Songs", Some("Albums")),
        ];
        let graph = InterleaveGraph::build(&tables).unwrap();
        assert_eq!(graph.parent_of(1), Some(0));
        assert_eq!(graph.parent_of(2), Some(1));
        assert_eq!(graph.children_of(0), &[1]);
        assert_eq!(graph.ancestors(2).unwrap(), vec![1, 0]);
        assert!(graph.is_ancestor_of(0, 2).unwrap());
        assert!(!graph.is_ancestor_of(2, 0).unwrap());
    }

    #[test]
    fn test_out_of_range_index_has_no_relatives() {
        let tables = vec![table("Singers", None), table("Albums", Some("Singers"))];
        let graph = InterleaveGraph::build(&tables).unwrap();
        assert_eq!(graph.parent_of(7), None);
        assert!(graph.parent_table(7).is_none());
        assert!(graph.children_of(7).is_empty());
        assert!(graph.ancestors(7).unwrap().is_empty());
    }

    #[test]
    fn test_missing_parent_is_reported() {
        let tables = vec![table("Albums", Some("Singers"))];
        let err = InterleaveGraph::build(&tables).unwrap_err();
        assert_eq!(
            err,
            DdlError::MissingParentTable {
                child: "Albums".to_string(),
                parent: "Singers".to_string(),
            }
        );
    }

    #[test]
    fn test_cycle_is_reported_instead_of_looping() {
        let tables = vec![table("A", Some("B")), table("B", Some("A"))];
        let err = InterleaveGraph::build(&tables).unwrap_err();
        assert!(matches!(err, DdlError::CyclicInterleaveGraph { .. }));
    }

    #[test]
    fn test_self_interleave_is_a_cycle() {
        let tables = vec![table("A", Some("a"))];
        let err = InterleaveGraph::build(&tables).unwrap_err();
        assert_eq!(err, DdlError::CyclicInterleaveGraph { table: "A".to_string() });
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let tables = vec![table("Singers", None), table("SINGERS", None)];
        let err = InterleaveGraph::build(&tables).unwrap_err();
        assert_eq!(err, DdlError::DuplicateTable { table: "SINGERS".to_string() });
    }
}

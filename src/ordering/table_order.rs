//! Table ordering for CREATE and DROP
//!
//! Parents must be created before the tables interleaved in them and dropped
//! after them. Tables are sorted with Kahn's algorithm over the interleave
//! graph; whenever several tables are ready, the one declared first wins, so a
//! namespace without interleaving keeps its input order exactly.

use super::graph::InterleaveGraph;
use crate::error::DdlError;
use crate::schema::Table;
use std::collections::BTreeSet;

/// Which schema operation the order is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ancestors first
    Create,
    /// Descendants first
    Drop,
}

/// Sort a namespace's tables for the given direction
///
/// # Errors
///
/// Returns [`DdlError::MissingParentTable`], [`DdlError::CyclicInterleaveGraph`]
/// or [`DdlError::DuplicateTable`] if the interleave annotations are malformed.
pub fn order_tables(tables: &[Table], direction: Direction) -> Result<Vec<&Table>, DdlError> {
    let graph = InterleaveGraph::build(tables)?;
    let order = topological_sort(&graph)?;
    Ok(apply_direction(order, direction)
        .into_iter()
        .map(|idx| &tables[idx])
        .collect())
}

/// Declaration indexes in creation order (ancestors first)
///
/// Ties are broken by declaration order.
pub fn topological_sort(graph: &InterleaveGraph<'_>) -> Result<Vec<usize>, DdlError> {
    let mut in_degree: Vec<usize> = (0..graph.len())
        .map(|idx| usize::from(graph.parent_of(idx).is_some()))
        .collect();

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(idx, _)| idx)
        .collect();

    let mut result = Vec::with_capacity(graph.len());
    while let Some(current) = ready.pop_first() {
        result.push(current);
        for &child in graph.children_of(current) {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if result.len() != graph.len() {
        // Everything left over sits on or below a cycle.
        let stuck = in_degree
            .iter()
            .position(|degree| *degree > 0)
            .unwrap_or_default();
        return Err(DdlError::CyclicInterleaveGraph {
            table: graph.tables()[stuck].name.clone(),
        });
    }

    log::debug!(
        "Interleave order: {}",
        result
            .iter()
            .map(|idx| graph.tables()[*idx].name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(result)
}

fn apply_direction(mut order: Vec<usize>, direction: Direction) -> Vec<usize> {
    if direction == Direction::Drop {
        order.reverse();
    }
    order
}

//! Dependency ordering for interleaved schemas
//!
//! This module provides functionality to:
//! - Build the interleave graph (child to parent) and validate it
//! - Topologically sort tables for creation, reversed for drops
//! - Order primary key columns consistently with the parent chain

pub mod column_order;
pub mod graph;
pub mod table_order;

pub use column_order::{ColumnOrderer, OrderedTable};
pub use graph::InterleaveGraph;
pub use table_order::{order_tables, topological_sort, Direction};

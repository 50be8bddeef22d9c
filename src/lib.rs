//! # interleave-ddl
//!
//! Schema DDL planning for databases that co-locate child rows with their
//! parent row ("interleaving"), charge heavily per schema statement, and can
//! only answer "does this index exist" through live catalog metadata.
//!
//! The crate orders tables so that parents are created before their children
//! (and dropped after them), orders key columns consistently with the parent
//! chain, rewrites generic CREATE TABLE text into the dialect form, tracks live
//! unique indexes for idempotent updates, and wraps everything in one DDL batch.
//!
//! The main entry point is [`SchemaTool`].

pub mod batch;
pub mod catalog;
pub mod config;
pub mod ddl;
pub mod error;
pub mod ordering;
pub mod schema;
pub mod tool;

pub use batch::{AuxiliaryObject, BatchWrapper, RUN_BATCH, START_BATCH_DDL};
pub use catalog::{Catalog, IndexColumn, LiveIndexTracker, StaticCatalog, UniqueIndex};
pub use config::{SchemaAction, SchemaConfig};
pub use ddl::{DdlStatementBuilder, GenericTableRenderer, StandardTableRenderer, UniqueKeyDelegate};
pub use error::{CatalogError, DdlError};
pub use ordering::{order_tables, ColumnOrderer, Direction, InterleaveGraph, OrderedTable};
pub use schema::{Column, Index, InterleaveSpec, Namespace, Table, UniqueKey};
pub use tool::SchemaTool;

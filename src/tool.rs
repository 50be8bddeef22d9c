//! SchemaTool - plans complete, ordered and batched DDL for a namespace
//!
//! Every operation validates the whole namespace first (parents, cycles,
//! duplicate tables, column references, primary keys) and only then produces
//! statements, so a malformed schema never yields a partial batch.
//!
//! # Example
//!
//! ```rust
//! use interleave_ddl::{Column, InterleaveSpec, Namespace, SchemaConfig, SchemaTool, Table};
//!
//! let namespace = Namespace::new(vec![
//!     Table::new("Parent").column(Column::new("parentId", "INT64").primary_key()),
//!     Table::new("Child")
//!         .interleave_in(InterleaveSpec::new("Parent").cascade_delete())
//!         .column(Column::new("parentId", "INT64").primary_key())
//!         .column(Column::new("childId", "INT64").primary_key()),
//! ]);
//!
//! let tool = SchemaTool::new(SchemaConfig::default());
//! let statements = tool.create(&namespace).unwrap();
//! assert_eq!(statements.first().map(String::as_str), Some("START BATCH DDL"));
//! assert!(statements[2].ends_with("INTERLEAVE IN PARENT `Parent` ON DELETE CASCADE"));
//! ```

use crate::batch::{assemble, BatchWrapper};
use crate::catalog::LiveIndexTracker;
use crate::config::{SchemaAction, SchemaConfig};
use crate::ddl::{DdlStatementBuilder, GenericTableRenderer, StandardTableRenderer, UniqueKeyDelegate};
use crate::error::DdlError;
use crate::ordering::{topological_sort, ColumnOrderer, Direction, InterleaveGraph};
use crate::schema::{Namespace, Table, UniqueKey};

/// Plans schema operations according to a [`SchemaConfig`]
pub struct SchemaTool<R = StandardTableRenderer> {
    config: SchemaConfig,
    renderer: R,
}

impl SchemaTool<StandardTableRenderer> {
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            renderer: StandardTableRenderer,
        }
    }
}

impl<R: GenericTableRenderer> SchemaTool<R> {
    /// Use a custom generic CREATE TABLE renderer
    pub fn with_renderer(config: SchemaConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Run the configured action
    pub fn run(
        &self,
        namespace: &Namespace,
        live: &mut LiveIndexTracker<'_>,
    ) -> Result<Vec<String>, DdlError> {
        self.execute(self.config.action, namespace, live)
    }

    /// Plan one schema action
    ///
    /// `create` yields a drop batch followed by a create batch.
    pub fn execute(
        &self,
        action: SchemaAction,
        namespace: &Namespace,
        live: &mut LiveIndexTracker<'_>,
    ) -> Result<Vec<String>, DdlError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("schema_operation", action = ?action).entered();

        let statements = match action {
            SchemaAction::None => Vec::new(),
            SchemaAction::CreateOnly => self.create(namespace)?,
            SchemaAction::Drop => self.drop(namespace, live)?,
            SchemaAction::Update => self.update(namespace, live)?,
            SchemaAction::Create => {
                let mut statements = self.drop(namespace, live)?;
                statements.extend(self.create(namespace)?);
                statements
            }
        };
        log::info!(
            "Planned {} statement(s) for {:?} of {} table(s)",
            statements.len(),
            action,
            namespace.tables.len()
        );
        Ok(statements)
    }

    /// Create every table, its indexes and its unique keys, parents first
    pub fn create(&self, namespace: &Namespace) -> Result<Vec<String>, DdlError> {
        let graph = validate(namespace, true)?;
        let orderer = ColumnOrderer::new(&graph);
        let delegate = UniqueKeyDelegate::full();
        // Full create never consults the catalog.
        let mut live = LiveIndexTracker::detached();

        let mut statements = Vec::new();
        for idx in topological_sort(&graph)? {
            let table = &graph.tables()[idx];
            self.create_table(&orderer, idx, &mut statements)?;
            for key in table.all_unique_keys() {
                statements.extend(delegate.alter_to_add(table, &key, &mut live));
            }
        }
        Ok(self.finish(namespace, statements, Direction::Create))
    }

    /// Drop every existing table and its existing indexes, children first
    pub fn drop(
        &self,
        namespace: &Namespace,
        live: &mut LiveIndexTracker<'_>,
    ) -> Result<Vec<String>, DdlError> {
        let graph = validate(namespace, false)?;
        let mut order = topological_sort(&graph)?;
        order.reverse();

        let mut statements = Vec::new();
        for idx in order {
            statements.extend(DdlStatementBuilder::build_drop(&graph.tables()[idx], live));
        }
        Ok(self.finish(namespace, statements, Direction::Drop))
    }

    /// Create missing tables and indexes; add unique keys with no live equivalent
    ///
    /// Existing tables are not diffed column by column.
    pub fn update(
        &self,
        namespace: &Namespace,
        live: &mut LiveIndexTracker<'_>,
    ) -> Result<Vec<String>, DdlError> {
        let graph = validate(namespace, true)?;
        let orderer = ColumnOrderer::new(&graph);
        let delegate = if self.config.check_live_indexes {
            UniqueKeyDelegate::incremental()
        } else {
            UniqueKeyDelegate::full()
        };

        let mut statements = Vec::new();
        for idx in topological_sort(&graph)? {
            let table = &graph.tables()[idx];
            if live.table_exists(&table.name) {
                for index in &table.indexes {
                    if !live.index_exists(&index.name) {
                        statements.push(DdlStatementBuilder::create_index(table, index));
                    }
                }
            } else {
                log::debug!("Table {} is missing, creating it", table.name);
                self.create_table(&orderer, idx, &mut statements)?;
            }
            for key in table.all_unique_keys() {
                statements.extend(delegate.alter_to_add(table, &key, live));
            }
        }
        Ok(self.finish(namespace, statements, Direction::Create))
    }

    /// Drop one unique key if an equivalent index exists live
    pub fn drop_unique_key(
        &self,
        table: &Table,
        key: &UniqueKey,
        live: &mut LiveIndexTracker<'_>,
    ) -> Option<String> {
        UniqueKeyDelegate::incremental().alter_to_drop(table, key, live)
    }

    fn create_table(
        &self,
        orderer: &ColumnOrderer<'_, '_>,
        idx: usize,
        statements: &mut Vec<String>,
    ) -> Result<(), DdlError> {
        let ordered = orderer.ordered_table(idx)?;
        let generic = self.renderer.render_create(&ordered);
        statements.push(DdlStatementBuilder::build_create(&ordered, &generic)?);
        for index in &ordered.table.indexes {
            statements.push(DdlStatementBuilder::create_index(ordered.table, index));
        }
        Ok(())
    }

    fn finish(&self, namespace: &Namespace, statements: Vec<String>, direction: Direction) -> Vec<String> {
        let mut auxiliary = namespace.auxiliary_objects.clone();
        if self.config.batch_ddl {
            auxiliary.extend(BatchWrapper::markers());
        }
        assemble(&auxiliary, statements, direction)
    }
}

/// Check the whole namespace before any statement is produced
fn validate(namespace: &Namespace, require_keys: bool) -> Result<InterleaveGraph<'_>, DdlError> {
    let graph = InterleaveGraph::build(&namespace.tables)?;
    for table in &namespace.tables {
        if require_keys && !table.has_primary_key() {
            return Err(DdlError::MissingPrimaryKey {
                table: table.name.clone(),
            });
        }
        let referenced = table
            .indexes
            .iter()
            .flat_map(|index| index.columns.iter())
            .chain(table.unique_keys.iter().flat_map(|key| key.columns.iter()));
        for column in referenced {
            if table.find_column(column).is_none() {
                return Err(DdlError::UnknownColumn {
                    table: table.name.clone(),
                    column: column.clone(),
                });
            }
        }
    }
    Ok(graph)
}

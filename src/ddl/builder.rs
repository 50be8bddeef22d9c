//! Dialect CREATE / DROP statement building
//!
//! The target differs from conventional SQL in two ways that matter here:
//! - the PRIMARY KEY goes after the column list, not inside it
//! - an interleaved table ends with `INTERLEAVE IN PARENT <parent>`, optionally
//!   followed by `ON DELETE CASCADE`
//!
//! DROP statements are only emitted for objects confirmed to exist, because the
//! target has no `IF EXISTS` for these statements and failed DDL is slow.

use crate::catalog::LiveIndexTracker;
use crate::error::DdlError;
use crate::ordering::OrderedTable;
use crate::schema::ident::name_key;
use crate::schema::{quote, Index, Table, UniqueKey};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static INLINE_PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*primary\s+key\s*\([^)]*\)").expect("primary key pattern is valid")
});

/// Builds the final per-table statements
pub struct DdlStatementBuilder;

impl DdlStatementBuilder {
    /// Rewrite a generic CREATE TABLE statement into the dialect form
    ///
    /// The inline primary key clause is removed and re-appended after the
    /// closing parenthesis, using the interleave-consistent key order.
    ///
    /// # Errors
    ///
    /// - [`DdlError::MissingPrimaryKey`] if the table has no key columns
    /// - [`DdlError::MalformedCreateStatement`] if there is no column list to anchor to
    pub fn build_create(
        table: &OrderedTable<'_>,
        generic_create_sql: &str,
    ) -> Result<String, DdlError> {
        if table.primary_key.is_empty() {
            return Err(DdlError::MissingPrimaryKey {
                table: table.name().to_string(),
            });
        }

        let stripped = INLINE_PRIMARY_KEY.replace(generic_create_sql, "");
        let body = stripped.trim_end().trim_end_matches(';').trim_end();
        if !body.contains('(') || !body.ends_with(')') {
            return Err(DdlError::MalformedCreateStatement {
                table: table.name().to_string(),
                reason: "statement does not end with a column list".to_string(),
            });
        }

        let mut create = format!("{} {}", body, Self::primary_key_clause(table));
        if let Some(spec) = table.interleave() {
            create.push_str(", INTERLEAVE IN PARENT ");
            create.push_str(&quote(&spec.parent_table));
            if spec.cascade_delete {
                create.push_str(" ON DELETE CASCADE");
            }
        }

        log::debug!("CREATE for {}: {}", table.name(), create);
        Ok(create)
    }

    /// `PRIMARY KEY (<cols>)` in interleave order
    pub fn primary_key_clause(table: &OrderedTable<'_>) -> String {
        format!("PRIMARY KEY ({})", table.primary_key_names().join(", "))
    }

    /// Drop the table's existing indexes, then the table itself
    ///
    /// Returns nothing if the table does not exist live. Indexes (secondary,
    /// declared unique keys and generated column unique keys) are only dropped
    /// when the tracker confirms them. A unique key is found by its column set
    /// first and dropped under its live name; the mapped name is the fallback.
    pub fn build_drop(table: &Table, live: &mut LiveIndexTracker<'_>) -> Vec<String> {
        if !live.table_exists(&table.name) {
            log::debug!("Table {} does not exist, nothing to drop", table.name);
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut statements = Vec::new();
        for index in &table.indexes {
            if seen.insert(name_key(&index.name)) && live.index_exists(&index.name) {
                statements.push(Self::drop_index(&index.name));
            }
        }
        for key in table.all_unique_keys() {
            let name = match live.exists(&key.columns, &table.name) {
                Some(existing) => {
                    live.forget(&existing);
                    existing.name
                }
                None if live.index_exists(&key.name) => key.name,
                None => continue,
            };
            if seen.insert(name_key(&name)) {
                statements.push(Self::drop_index(&name));
            }
        }
        statements.push(Self::drop_table(table));
        statements
    }

    pub fn drop_table(table: &Table) -> String {
        format!("DROP TABLE {}", quote(&table.name))
    }

    pub fn drop_index(name: &str) -> String {
        format!("DROP INDEX {}", quote(name))
    }

    /// Index names are never schema-qualified on the target
    pub fn create_index(table: &Table, index: &Index) -> String {
        format!(
            "create index {} on {} ({})",
            quote(&index.name),
            quote(&table.name),
            index.columns.join(", ")
        )
    }

    pub fn create_unique_index(table: &Table, key: &UniqueKey) -> String {
        format!(
            "create unique index {} on {} ({})",
            quote(&key.name),
            quote(&table.name),
            key.columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::ordering::{ColumnOrderer, InterleaveGraph};
    use crate::schema::{unique_key_name, Column, InterleaveSpec};

    fn parent_and_child(cascade: bool) -> Vec<Table> {
        let spec = InterleaveSpec::new("Parent");
        vec![
            Table::new("Parent").column(Column::new("parentId", "INT64").primary_key()),
            Table::new("Child")
                .interleave_in(if cascade { spec.cascade_delete() } else { spec })
                .column(Column::new("childId", "INT64").primary_key())
                .column(Column::new("parentId", "INT64").primary_key()),
        ]
    }

    #[test]
    fn test_build_create_relocates_primary_key() {
        let tables = parent_and_child(false);
        let graph = InterleaveGraph::build(&tables).unwrap();
        let parent = ColumnOrderer::new(&graph).ordered_table(0).unwrap();
        let sql = DdlStatementBuilder::build_create(
            &parent,
            "create table `Parent` (parentId INT64 not null, PRIMARY KEY (parentId))",
        )
        .unwrap();
        assert_eq!(
            sql,
            "create table `Parent` (parentId INT64 not null) PRIMARY KEY (parentId)"
        );
    }

    #[test]
    fn test_build_create_interleaved_with_cascade() {
        let tables = parent_and_child(true);
        let graph = InterleaveGraph::build(&tables).unwrap();
        let child = ColumnOrderer::new(&graph).ordered_table(1).unwrap();
        let sql = DdlStatementBuilder::build_create(
            &child,
            "create table `Child` (childId INT64 not null, parentId INT64 not null, primary key (childId, parentId));",
        )
        .unwrap();
        assert!(sql.ends_with(
            "PRIMARY KEY (parentId, childId), INTERLEAVE IN PARENT `Parent` ON DELETE CASCADE"
        ));
    }

    #[test]
    fn test_build_create_without_cascade() {
        let tables = parent_and_child(false);
        let graph = InterleaveGraph::build(&tables).unwrap();
        let child = ColumnOrderer::new(&graph).ordered_table(1).unwrap();
        let sql = DdlStatementBuilder::build_create(
            &child,
            "create table `Child` (childId INT64, parentId INT64)",
        )
        .unwrap();
        assert_eq!(
            sql,
            "create table `Child` (childId INT64, parentId INT64) \
             PRIMARY KEY (parentId, childId), INTERLEAVE IN PARENT `Parent`"
        );
    }

    #[test]
    fn test_build_create_requires_primary_key() {
        let tables = vec![Table::new("NoKey").column(Column::new("v", "INT64"))];
        let graph = InterleaveGraph::build(&tables).unwrap();
        let ordered = ColumnOrderer::new(&graph).ordered_table(0).unwrap();
        let err = DdlStatementBuilder::build_create(&ordered, "create table `NoKey` (v INT64)")
            .unwrap_err();
        assert_eq!(err, DdlError::MissingPrimaryKey { table: "NoKey".to_string() });
    }

    #[test]
    fn test_build_create_rejects_text_without_column_list() {
        let tables = parent_and_child(false);
        let graph = InterleaveGraph::build(&tables).unwrap();
        let parent = ColumnOrderer::new(&graph).ordered_table(0).unwrap();
        let err = DdlStatementBuilder::build_create(&parent, "create table `Parent`").unwrap_err();
        assert!(matches!(err, DdlError::MalformedCreateStatement { .. }));
    }

    #[test]
    fn test_build_drop_only_existing_objects() {
        let table = Table::new("Singers")
            .column(Column::new("SingerId", "INT64").primary_key())
            .column(Column::new("Email", "STRING(MAX)").unique())
            .index("SingersByName", ["Name"])
            .index("SingersByAge", ["Age"]);
        let generated = unique_key_name("Singers", "Email");
        let catalog = StaticCatalog::new()
            .with_table("SINGERS")
            .with_index("SingersByName", "Singers", &["Name"], false)
            .with_index(&generated, "Singers", &["Email"], true);
        let mut live = LiveIndexTracker::new(&catalog);

        let statements = DdlStatementBuilder::build_drop(&table, &mut live);
        assert_eq!(
            statements,
            vec![
                "DROP INDEX `SingersByName`".to_string(),
                format!("DROP INDEX `{generated}`"),
                "DROP TABLE `Singers`".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_drop_unique_key_under_live_name() {
        let table = Table::new("Users")
            .column(Column::new("UserId", "INT64").primary_key())
            .column(Column::new("Email", "STRING(MAX)"))
            .unique_key(UniqueKey::new("UK_users_email", ["Email"]))
            .unique_key(UniqueKey::new("UK_users_email_again", ["email"]));
        let catalog = StaticCatalog::new()
            .with_table("Users")
            .with_index("IDX_EMAIL_0001", "Users", &["EMAIL"], true);
        let mut live = LiveIndexTracker::new(&catalog);

        assert_eq!(
            DdlStatementBuilder::build_drop(&table, &mut live),
            vec![
                "DROP INDEX `IDX_EMAIL_0001`".to_string(),
                "DROP TABLE `Users`".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_drop_missing_table_is_noop() {
        let table = Table::new("Ghost").index("GhostIdx", ["x"]);
        let catalog = StaticCatalog::new().with_index("GhostIdx", "Ghost", &["x"], false);
        let mut live = LiveIndexTracker::new(&catalog);
        assert!(DdlStatementBuilder::build_drop(&table, &mut live).is_empty());
    }

    #[test]
    fn test_build_drop_detached_returns_nothing() {
        let table = Table::new("Singers");
        let mut live = LiveIndexTracker::detached();
        assert!(DdlStatementBuilder::build_drop(&table, &mut live).is_empty());
    }

    #[test]
    fn test_create_index_statements() {
        let table = Table::new("Singers");
        let index = Index {
            name: "SingersByName".to_string(),
            columns: vec!["LastName".to_string(), "FirstName".to_string()],
        };
        assert_eq!(
            DdlStatementBuilder::create_index(&table, &index),
            "create index `SingersByName` on `Singers` (LastName, FirstName)"
        );
        let key = UniqueKey::new("UQ_Email", ["Email"]);
        assert_eq!(
            DdlStatementBuilder::create_unique_index(&table, &key),
            "create unique index `UQ_Email` on `Singers` (Email)"
        );
    }
}

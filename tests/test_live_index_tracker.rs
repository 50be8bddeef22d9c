//! Tests for live index tracking and the statements that depend on it

use interleave_ddl::catalog::tracker::Existence;
use interleave_ddl::{
    Catalog, CatalogError, Column, IndexColumn, LiveIndexTracker, Namespace, SchemaAction,
    SchemaConfig, SchemaTool, StaticCatalog, Table, UniqueKey, RUN_BATCH, START_BATCH_DDL,
};

struct OfflineCatalog;

impl Catalog for OfflineCatalog {
    fn tables(&self) -> Result<Vec<String>, CatalogError> {
        Err(CatalogError::Unavailable)
    }

    fn index_columns(&self) -> Result<Vec<IndexColumn>, CatalogError> {
        Err(CatalogError::Unavailable)
    }
}

#[test]
fn test_exists_requires_set_equal_columns() {
    let catalog = StaticCatalog::new()
        .with_table("T")
        .with_index("idx_t_xy", "T", &["x", "y"], true);
    let mut tracker = LiveIndexTracker::new(&catalog);

    let found = tracker.exists(&["y", "x"], "T").unwrap();
    assert_eq!(found.name, "idx_t_xy");
    assert!(tracker.exists(&["Y", "X"], "t").is_some());
    assert!(tracker.exists(&["x"], "T").is_none());
    assert!(tracker.exists(&["x", "y", "w"], "T").is_none());
}

#[test]
fn test_unavailable_catalog_behaves_like_detached() {
    let catalog = OfflineCatalog;
    let mut tracker = LiveIndexTracker::new(&catalog);
    assert_eq!(tracker.probe(&["x"], "T"), Existence::Unknown);
    assert!(!tracker.table_exists("T"));
}

fn users() -> Namespace {
    Namespace::new(vec![Table::new("Users")
        .column(Column::new("UserId", "INT64").primary_key())
        .column(Column::new("Email", "STRING(MAX)"))
        .column(Column::new("Handle", "STRING(64)"))
        .unique_key(UniqueKey::new("UK_users_email", ["Email"]))
        .unique_key(UniqueKey::new("UK_users_handle", ["Handle"]))])
}

#[test]
fn test_update_skips_unique_keys_known_under_other_names() {
    let catalog = StaticCatalog::new()
        .with_table("Users")
        .with_index("IDX_EMAIL_0001", "Users", &["EMAIL"], true);
    let mut live = LiveIndexTracker::new(&catalog);
    let tool = SchemaTool::new(SchemaConfig::default().with_action(SchemaAction::Update));

    assert_eq!(
        tool.run(&users(), &mut live).unwrap(),
        vec![
            START_BATCH_DDL.to_string(),
            "create unique index `UK_users_handle` on `Users` (Handle)".to_string(),
            RUN_BATCH.to_string(),
        ]
    );
}

#[test]
fn test_drop_removes_unique_index_known_under_other_name() {
    let catalog = StaticCatalog::new()
        .with_table("Users")
        .with_index("IDX_EMAIL_0001", "Users", &["EMAIL"], true);
    let tool = SchemaTool::new(SchemaConfig::default().without_batching());

    let mut live = LiveIndexTracker::new(&catalog);
    let updated = tool.update(&users(), &mut live).unwrap();
    assert!(!updated.iter().any(|s| s.contains("UK_users_email")));

    let mut live = LiveIndexTracker::new(&catalog);
    assert_eq!(
        tool.drop(&users(), &mut live).unwrap(),
        vec![
            "DROP INDEX `IDX_EMAIL_0001`".to_string(),
            "DROP TABLE `Users`".to_string(),
        ]
    );
}

#[test]
fn test_update_without_catalog_emits_everything() {
    let mut live = LiveIndexTracker::detached();
    let tool = SchemaTool::new(SchemaConfig::default().without_batching());
    let statements = tool.update(&users(), &mut live).unwrap();
    assert_eq!(statements.len(), 3);
    assert!(statements[0].starts_with("create table `Users`"));
}

#[test]
fn test_create_ignores_live_indexes() {
    let tool = SchemaTool::new(SchemaConfig::default().without_batching());
    let statements = tool.create(&users()).unwrap();
    assert_eq!(
        &statements[1..],
        &[
            "create unique index `UK_users_email` on `Users` (Email)".to_string(),
            "create unique index `UK_users_handle` on `Users` (Handle)".to_string(),
        ]
    );
}

#[test]
fn test_drop_without_catalog_emits_no_table_drops() {
    let mut live = LiveIndexTracker::detached();
    let tool = SchemaTool::new(SchemaConfig::default().without_batching());
    assert!(tool.drop(&users(), &mut live).unwrap().is_empty());
}

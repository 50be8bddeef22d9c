//! Generic (pre-dialect) CREATE TABLE rendering
//!
//! The dialect rewrite in [`DdlStatementBuilder`](super::DdlStatementBuilder)
//! starts from a conventional statement with an inline primary key clause.
//! Any renderer can supply it; [`StandardTableRenderer`] is the default.

use crate::ordering::OrderedTable;
use crate::schema::quote;

/// Fallback type for columns without an explicit type
pub const DEFAULT_COLUMN_TYPE: &str = "STRING(MAX)";

/// Produces a generic CREATE TABLE statement for a table
pub trait GenericTableRenderer {
    /// Render `create table <name> (<columns>, primary key (<cols>))`
    fn render_create(&self, table: &OrderedTable<'_>) -> String;
}

/// Renders columns in the ordered view's column order
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTableRenderer;

impl GenericTableRenderer for StandardTableRenderer {
    fn render_create(&self, table: &OrderedTable<'_>) -> String {
        let mut parts: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let sql_type = column.sql_type.as_deref().unwrap_or(DEFAULT_COLUMN_TYPE);
                if column.nullable {
                    format!("{} {}", column.name, sql_type)
                } else {
                    format!("{} {} not null", column.name, sql_type)
                }
            })
            .collect();

        if !table.primary_key.is_empty() {
            parts.push(format!("primary key ({})", table.primary_key_names().join(", ")));
        }

        format!("create table {} ({})", quote(table.name()), parts.join(", "))
    }
}

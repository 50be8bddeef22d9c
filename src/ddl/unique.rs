//! Unique-key statements for create and update
//!
//! In full create mode the target starts empty, so every unique index is
//! emitted. In incremental mode the live catalog is consulted first so that an
//! equivalent index (same table, same column set, any name) is not created
//! twice, and an index that is not there is not dropped.

use super::DdlStatementBuilder;
use crate::catalog::tracker::Existence;
use crate::catalog::LiveIndexTracker;
use crate::schema::{Table, UniqueKey};

/// Decides whether unique-key statements are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueKeyDelegate {
    incremental: bool,
}

impl UniqueKeyDelegate {
    /// Full create/drop: never consult the live catalog for adds
    pub fn full() -> Self {
        Self { incremental: false }
    }

    /// Update mode: skip adds for keys that already exist live
    pub fn incremental() -> Self {
        Self { incremental: true }
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    /// Statement adding a unique key, or `None` if an equivalent index exists
    ///
    /// If live metadata is unavailable the key is assumed absent.
    pub fn alter_to_add(
        &self,
        table: &Table,
        key: &UniqueKey,
        live: &mut LiveIndexTracker<'_>,
    ) -> Option<String> {
        if self.incremental {
            if let Some(existing) = live.exists(&key.columns, &table.name) {
                log::debug!(
                    "Unique key {} on {} already exists as {}",
                    key.name,
                    table.name,
                    existing.name
                );
                return None;
            }
        }
        Some(DdlStatementBuilder::create_unique_index(table, key))
    }

    /// Statement dropping a unique key, or `None` if no equivalent index exists
    ///
    /// The live index's own name is dropped, since it may differ from the
    /// mapped key name. If live metadata is unavailable the key is assumed
    /// present and dropped by its mapped name.
    pub fn alter_to_drop(
        &self,
        table: &Table,
        key: &UniqueKey,
        live: &mut LiveIndexTracker<'_>,
    ) -> Option<String> {
        match live.probe(&key.columns, &table.name) {
            Existence::Present(index) => {
                live.forget(&index);
                Some(DdlStatementBuilder::drop_index(&index.name))
            }
            Existence::Absent => {
                log::debug!("Unique key {} on {} does not exist", key.name, table.name);
                None
            }
            Existence::Unknown => Some(DdlStatementBuilder::drop_index(&key.name)),
        }
    }
}

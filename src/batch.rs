//! DDL batching
//!
//! The target accepts many DDL statements as one administrative operation when
//! they are bracketed by `START BATCH DDL` and `RUN BATCH`. Schema generation
//! often emits dozens of statements, so batching them is much faster than one
//! round trip each.
//!
//! The two markers are auxiliary schema objects with a pinned placement: they
//! go first and last no matter how the tables, or any other auxiliary objects,
//! were ordered.

use crate::ordering::Direction;

/// Statement that opens a DDL batch
pub const START_BATCH_DDL: &str = "START BATCH DDL";
/// Statement that submits a DDL batch
pub const RUN_BATCH: &str = "RUN BATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuxiliaryKind {
    StartBatch,
    RunBatch,
    Custom,
}

/// A non-table schema object emitted around the table statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryObject {
    kind: AuxiliaryKind,
    export_identifier: String,
    before_tables_on_creation: bool,
    create_statements: Vec<String>,
    drop_statements: Vec<String>,
}

impl AuxiliaryObject {
    /// A caller-supplied object
    ///
    /// Objects created before the tables are dropped after them.
    pub fn new(
        export_identifier: impl Into<String>,
        before_tables_on_creation: bool,
        create_statements: Vec<String>,
        drop_statements: Vec<String>,
    ) -> Self {
        Self {
            kind: AuxiliaryKind::Custom,
            export_identifier: export_identifier.into(),
            before_tables_on_creation,
            create_statements,
            drop_statements,
        }
    }

    pub fn start_batch_ddl() -> Self {
        Self {
            kind: AuxiliaryKind::StartBatch,
            export_identifier: "START_BATCH_DDL".to_string(),
            before_tables_on_creation: true,
            create_statements: vec![START_BATCH_DDL.to_string()],
            drop_statements: vec![START_BATCH_DDL.to_string()],
        }
    }

    pub fn run_batch_ddl() -> Self {
        Self {
            kind: AuxiliaryKind::RunBatch,
            export_identifier: "RUN_BATCH_DDL".to_string(),
            before_tables_on_creation: false,
            create_statements: vec![RUN_BATCH.to_string()],
            drop_statements: vec![RUN_BATCH.to_string()],
        }
    }

    pub fn export_identifier(&self) -> &str {
        &self.export_identifier
    }

    pub fn before_tables_on_creation(&self) -> bool {
        self.before_tables_on_creation
    }

    pub fn statements(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Create => &self.create_statements,
            Direction::Drop => &self.drop_statements,
        }
    }

    /// Sort key: 0 and 3 are pinned, 1 is before the tables, 2 after
    fn rank(&self, direction: Direction) -> u8 {
        match self.kind {
            AuxiliaryKind::StartBatch => 0,
            AuxiliaryKind::RunBatch => 3,
            AuxiliaryKind::Custom => match (self.before_tables_on_creation, direction) {
                (true, Direction::Create) | (false, Direction::Drop) => 1,
                _ => 2,
            },
        }
    }

    fn precedes_tables(&self, direction: Direction) -> bool {
        self.rank(direction) < 2
    }
}

/// Place auxiliary objects around the ordered table statements
pub fn assemble(
    auxiliary: &[AuxiliaryObject],
    table_statements: Vec<String>,
    direction: Direction,
) -> Vec<String> {
    let mut objects: Vec<&AuxiliaryObject> = auxiliary.iter().collect();
    objects.sort_by_key(|object| object.rank(direction));

    let (before, after): (Vec<&AuxiliaryObject>, Vec<&AuxiliaryObject>) = objects
        .into_iter()
        .partition(|object| object.precedes_tables(direction));

    let mut statements: Vec<String> = before
        .iter()
        .flat_map(|object| object.statements(direction).iter().cloned())
        .collect();
    statements.extend(table_statements);
    statements.extend(
        after
            .iter()
            .flat_map(|object| object.statements(direction).iter().cloned()),
    );
    statements
}

/// Brackets an ordered statement sequence into a single DDL batch
pub struct BatchWrapper;

impl BatchWrapper {
    /// The markers used for every batch
    pub fn markers() -> [AuxiliaryObject; 2] {
        [AuxiliaryObject::start_batch_ddl(), AuxiliaryObject::run_batch_ddl()]
    }

    pub fn wrap(statements: Vec<String>) -> Vec<String> {
        assemble(&Self::markers(), statements, Direction::Create)
    }
}

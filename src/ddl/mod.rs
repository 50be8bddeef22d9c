//! DDL statement generation

pub mod builder;
pub mod generic;
pub mod unique;

pub use builder::DdlStatementBuilder;
pub use generic::{GenericTableRenderer, StandardTableRenderer};
pub use unique::UniqueKeyDelegate;

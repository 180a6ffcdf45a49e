//! Infrastructure layer.

pub mod migrations;

pub use migrations::Migrator;

/// Connection wrapper bound to this service's migrator.
pub type Database = common::Database<Migrator>;

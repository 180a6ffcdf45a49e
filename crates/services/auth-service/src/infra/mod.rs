//! Infrastructure layer - database and messaging.

pub mod migrations;

pub use migrations::Migrator;

/// Database handle bound to this service's migrations.
pub type Database = common::Database<Migrator>;

//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_venues_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_venues_table::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("venue_service_migrations").into_iden()
    }
}

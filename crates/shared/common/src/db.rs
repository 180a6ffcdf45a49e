//! Database connection and migrations.

use std::marker::PhantomData;
use std::time::Duration;

use sea_orm::sqlx::{self, error::ErrorKind};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, RuntimeErr, Statement,
};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::config::DatabaseConfig;

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Connection wrapper bound to one service's migrator.
pub struct Database<M> {
    connection: DatabaseConnection,
    _migrator: PhantomData<fn() -> M>,
}

impl<M> Clone for Database<M> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _migrator: PhantomData,
        }
    }
}

impl<M: MigratorTrait> Database<M> {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        M::up(&db.connection, None).await?;
        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self {
            connection,
            _migrator: PhantomData,
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run one migration action and report it.
    pub async fn migrate(&self, action: MigrateAction) -> Result<(), DbErr> {
        match action {
            MigrateAction::Up => {
                M::up(&self.connection, None).await?;
                tracing::info!("Migrations applied successfully");
            }
            MigrateAction::Down => {
                M::down(&self.connection, Some(1)).await?;
                tracing::info!("Rolled back last migration");
            }
            MigrateAction::Status => {
                for (name, applied) in self.migration_status().await? {
                    let marker = if applied { "[x]" } else { "[ ]" };
                    println!("{} {}", marker, name);
                }
            }
            MigrateAction::Fresh => {
                M::fresh(&self.connection).await?;
                tracing::info!("Database reset and migrations applied");
            }
        }
        Ok(())
    }

    /// All known migrations with their applied flag.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        Ok(M::get_migration_with_status(&self.connection)
            .await?
            .iter()
            .map(|m| (m.name().to_string(), m.status() == MigrationStatus::Applied))
            .collect())
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        ping(&self.connection).await
    }
}

/// `SELECT 1` against a bare connection, for health handlers.
pub async fn ping(connection: &DatabaseConnection) -> Result<(), DbErr> {
    connection
        .execute(Statement::from_string(
            connection.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .map(|_| ())
}

/// Detail of a unique-index violation, `None` for any other error.
///
/// The detail starts with the constraint name when the driver reports one,
/// followed by the database message.
pub fn unique_violation(err: &DbErr) -> Option<String> {
    let (DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
    | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))) = err
    else {
        return None;
    };

    if !matches!(db_err.kind(), ErrorKind::UniqueViolation) {
        return None;
    }

    Some(match db_err.constraint() {
        Some(name) => format!("{}: {}", name, db_err.message()),
        None => db_err.message().to_string(),
    })
}

/// Driver errors for repository tests, shaped like the ones Postgres returns.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::fmt;

    use sea_orm::sqlx::error::{DatabaseError, ErrorKind};
    use sea_orm::{sqlx, DbErr, RuntimeErr};

    #[derive(Debug)]
    struct DriverError {
        message: String,
        constraint: Option<String>,
        unique: bool,
    }

    impl fmt::Display for DriverError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl std::error::Error for DriverError {}

    impl DatabaseError for DriverError {
        fn message(&self) -> &str {
            &self.message
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint.as_deref()
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn query_error(error: DriverError) -> DbErr {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(error))))
    }

    /// An insert rejected by the unique index `constraint`.
    pub fn unique_violation_error(constraint: &str) -> DbErr {
        query_error(DriverError {
            message: format!("duplicate key value violates unique constraint \"{}\"", constraint),
            constraint: Some(constraint.to_string()),
            unique: true,
        })
    }

    /// Any other driver failure, such as a NOT NULL violation.
    pub fn other_database_error(message: &str) -> DbErr {
        query_error(DriverError {
            message: message.to_string(),
            constraint: None,
            unique: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{other_database_error, unique_violation_error};
    use super::*;

    #[test]
    fn unique_violation_names_constraint() {
        let detail = unique_violation(&unique_violation_error("users_email_key")).unwrap();
        assert!(detail.starts_with("users_email_key: "));
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        assert!(unique_violation(&other_database_error("null value in column \"name\"")).is_none());
        assert!(unique_violation(&DbErr::RecordNotInserted).is_none());
    }
}

//! User repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::db::unique_violation;
use common::{AppError, AppResult};
use domain::{join_roles, User, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields of a user about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub roles: Vec<UserRole>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate email is a `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Store (or clear with `None`) the current refresh token.
    async fn set_refresh_token(&self, id: Uuid, token: Option<String>) -> AppResult<()>;
}

/// SeaORM-backed [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match unique_violation(&err) {
        Some(_) => AppError::conflict("Email already registered"),
        None => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            roles: Set(join_roles(&new_user.roles)),
            refresh_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(User::from(model))
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<String>) -> AppResult<()> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut active: ActiveModel = user.into();
        active.refresh_token = Set(token);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::db::testing::{other_database_error, unique_violation_error};

    #[test]
    fn duplicate_email_is_conflict() {
        let err = map_insert_error(unique_violation_error("users_email_key"));
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already registered"));
    }

    #[test]
    fn other_insert_failures_stay_database_errors() {
        let err = map_insert_error(other_database_error("null value in column \"name\""));
        assert!(matches!(err, AppError::Database(_)));
    }
}

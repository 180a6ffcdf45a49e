//! Attendee repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::attendee::{self, ActiveModel, Entity as AttendeeEntity};
use crate::infra::migrations::EVENT_USER_INDEX;
use common::db::unique_violation;
use common::{AppError, AppResult};
use domain::{Attendee, AttendeeStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) const ALREADY_REGISTERED: &str = "User already registered for this event";

/// Attendee repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// The registration of `user_id` for `event_id`, whatever its status.
    async fn find_by_event_and_user(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Attendee>>;

    async fn find_by_ticket(&self, ticket_number: &str) -> AppResult<Option<Attendee>>;

    /// Registrations of a user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Attendee>>;

    /// Registrations of an event, oldest first.
    async fn list_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>>;

    /// Insert a REGISTERED row. A second row for the same pair is a `Conflict`.
    async fn create(&self, event_id: Uuid, user_id: Uuid, ticket_number: String) -> AppResult<Attendee>;

    async fn set_status(&self, id: Uuid, status: AttendeeStatus) -> AppResult<Attendee>;

    /// Rows of `event_id` that occupy a seat.
    async fn count_active(&self, event_id: Uuid) -> AppResult<i64>;
}

/// SeaORM-backed [`AttendeeRepository`].
pub struct AttendeeStore {
    db: DatabaseConnection,
}

impl AttendeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// The losing insert of a concurrent double registration hits [`EVENT_USER_INDEX`].
fn map_insert_error(err: DbErr) -> AppError {
    match unique_violation(&err) {
        Some(detail) if detail.contains(EVENT_USER_INDEX) => AppError::conflict(ALREADY_REGISTERED),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AttendeeRepository for AttendeeStore {
    async fn find_by_event_and_user(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Attendee>> {
        let result = AttendeeEntity::find()
            .filter(attendee::Column::EventId.eq(event_id))
            .filter(attendee::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Attendee::from))
    }

    async fn find_by_ticket(&self, ticket_number: &str) -> AppResult<Option<Attendee>> {
        let result = AttendeeEntity::find()
            .filter(attendee::Column::TicketNumber.eq(ticket_number))
            .one(&self.db)
            .await?;
        Ok(result.map(Attendee::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Attendee>> {
        let rows = AttendeeEntity::find()
            .filter(attendee::Column::UserId.eq(user_id))
            .order_by_desc(attendee::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Attendee::from).collect())
    }

    async fn list_by_event(&self, event_id: Uuid) -> AppResult<Vec<Attendee>> {
        let rows = AttendeeEntity::find()
            .filter(attendee::Column::EventId.eq(event_id))
            .order_by_asc(attendee::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Attendee::from).collect())
    }

    async fn create(&self, event_id: Uuid, user_id: Uuid, ticket_number: String) -> AppResult<Attendee> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            user_id: Set(user_id),
            ticket_number: Set(ticket_number),
            status: Set(AttendeeStatus::Registered.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(Attendee::from(model))
    }

    async fn set_status(&self, id: Uuid, status: AttendeeStatus) -> AppResult<Attendee> {
        let row = AttendeeEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Registration not found"))?;

        let mut active: ActiveModel = row.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Attendee::from(model))
    }

    async fn count_active(&self, event_id: Uuid) -> AppResult<i64> {
        let count = AttendeeEntity::find()
            .filter(attendee::Column::EventId.eq(event_id))
            .filter(
                attendee::Column::Status
                    .is_in(AttendeeStatus::ACTIVE.iter().map(|s| s.as_str())),
            )
            .count(&self.db)
            .await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

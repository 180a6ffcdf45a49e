//! Event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::event::{self, ActiveModel, Entity as EventEntity};
use common::{AppError, AppResult};
use domain::{CreateEvent, Event};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Event repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// Events of one organizer, soonest first.
    async fn list_by_organizer(&self, organizer_id: Uuid) -> AppResult<Vec<Event>>;

    async fn create(&self, organizer_id: Uuid, event: CreateEvent) -> AppResult<Event>;

    /// Persist every mutable field of `event`.
    async fn update(&self, event: Event) -> AppResult<Event>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Distinct ids among `venue_ids` that host an event in `[from, until)`.
    /// `exclude` leaves one event out of the search.
    async fn find_booked_venues(
        &self,
        venue_ids: &[Uuid],
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> AppResult<Vec<Uuid>>;
}

/// SeaORM-backed [`EventRepository`].
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for EventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        let result = EventEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Event::from))
    }

    async fn list_by_organizer(&self, organizer_id: Uuid) -> AppResult<Vec<Event>> {
        let events = EventEntity::find()
            .filter(event::Column::OrganizerId.eq(organizer_id))
            .order_by_asc(event::Column::Date)
            .all(&self.db)
            .await?;

        Ok(events.into_iter().map(Event::from).collect())
    }

    async fn create(&self, organizer_id: Uuid, input: CreateEvent) -> AppResult<Event> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            date: Set(input.date),
            venue_id: Set(input.venue_id),
            organizer_id: Set(organizer_id),
            capacity: Set(input.capacity),
            price: Set(input.price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Event::from(model))
    }

    async fn update(&self, updated: Event) -> AppResult<Event> {
        let existing = EventEntity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(updated.title);
        active.description = Set(updated.description);
        active.date = Set(updated.date);
        active.venue_id = Set(updated.venue_id);
        active.capacity = Set(updated.capacity);
        active.price = Set(updated.price);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Event::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = EventEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Event not found"));
        }
        Ok(())
    }

    async fn find_booked_venues(
        &self,
        venue_ids: &[Uuid],
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> AppResult<Vec<Uuid>> {
        if venue_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = EventEntity::find()
            .select_only()
            .column(event::Column::VenueId)
            .distinct()
            .filter(event::Column::VenueId.is_in(venue_ids.iter().copied()))
            .filter(event::Column::Date.gte(from))
            .filter(event::Column::Date.lt(until));

        if let Some(id) = exclude {
            query = query.filter(event::Column::Id.ne(id));
        }

        let booked = query.into_tuple::<Uuid>().all(&self.db).await?;
        Ok(booked)
    }
}

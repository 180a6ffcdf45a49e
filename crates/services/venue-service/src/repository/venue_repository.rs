//! Venue repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::venue::{self, ActiveModel, Entity as VenueEntity};
use common::AppResult;
use domain::{CreateVenue, Venue, VenueStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Venue repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// All venues, newest first.
    async fn list(&self) -> AppResult<Vec<Venue>>;

    /// ACTIVE venues seating at least `capacity`, smallest first.
    async fn list_active_with_capacity(&self, capacity: i32) -> AppResult<Vec<Venue>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Venue>>;

    async fn create(&self, venue: CreateVenue) -> AppResult<Venue>;

    /// Persist every mutable field. `None` when the venue is gone.
    async fn update(&self, venue: Venue) -> AppResult<Option<Venue>>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed [`VenueRepository`].
pub struct VenueStore {
    db: DatabaseConnection,
}

impl VenueStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VenueRepository for VenueStore {
    async fn list(&self) -> AppResult<Vec<Venue>> {
        let venues = VenueEntity::find()
            .order_by_desc(venue::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(venues.into_iter().map(Venue::from).collect())
    }

    async fn list_active_with_capacity(&self, capacity: i32) -> AppResult<Vec<Venue>> {
        let venues = VenueEntity::find()
            .filter(venue::Column::Status.eq(VenueStatus::Active.as_str()))
            .filter(venue::Column::Capacity.gte(capacity))
            .order_by_asc(venue::Column::Capacity)
            .all(&self.db)
            .await?;
        Ok(venues.into_iter().map(Venue::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Venue>> {
        let result = VenueEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Venue::from))
    }

    async fn create(&self, input: CreateVenue) -> AppResult<Venue> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            capacity: Set(input.capacity),
            status: Set(input.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Venue::from(model))
    }

    async fn update(&self, updated: Venue) -> AppResult<Option<Venue>> {
        let Some(existing) = VenueEntity::find_by_id(updated.id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(updated.name);
        active.address = Set(updated.address);
        active.capacity = Set(updated.capacity);
        active.status = Set(updated.status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(Venue::from(model)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = VenueEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

//! Venue service - catalogue management and availability search.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{CreateVenue, UpdateVenue, Venue, VenueAvailabilityRequest};

use crate::client::EventServiceClient;
use crate::repository::VenueRepository;

const VENUE_NOT_FOUND: &str = "Venue not found";

/// Venue service trait for dependency injection.
#[async_trait]
pub trait VenueService: Send + Sync {
    async fn list_venues(&self) -> AppResult<Vec<Venue>>;

    /// ACTIVE venues seating `capacity`, optionally free on the day of `date`.
    async fn available_venues(&self, capacity: i32, date: Option<DateTime<Utc>>) -> AppResult<Vec<Venue>>;

    async fn get_venue(&self, id: Uuid) -> AppResult<Venue>;

    async fn create_venue(&self, input: CreateVenue) -> AppResult<Venue>;

    async fn update_venue(&self, id: Uuid, update: UpdateVenue) -> AppResult<Venue>;

    async fn delete_venue(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete [`VenueService`].
pub struct VenueManager {
    repo: Arc<dyn VenueRepository>,
    events: Arc<dyn EventServiceClient>,
}

impl VenueManager {
    pub fn new(repo: Arc<dyn VenueRepository>, events: Arc<dyn EventServiceClient>) -> Self {
        Self { repo, events }
    }
}

#[async_trait]
impl VenueService for VenueManager {
    async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        self.repo.list().await
    }

    async fn available_venues(&self, capacity: i32, date: Option<DateTime<Utc>>) -> AppResult<Vec<Venue>> {
        let venues = self.repo.list_active_with_capacity(capacity).await?;

        let Some(date) = date else {
            return Ok(venues);
        };
        if venues.is_empty() {
            return Ok(venues);
        }

        let availability = self
            .events
            .venue_availability(VenueAvailabilityRequest {
                venue_ids: venues.iter().map(|v| v.id).collect(),
                date,
            })
            .await?;

        Ok(venues
            .into_iter()
            .filter(|v| availability.available_venue_ids.contains(&v.id))
            .collect())
    }

    async fn get_venue(&self, id: Uuid) -> AppResult<Venue> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(VENUE_NOT_FOUND))
    }

    async fn create_venue(&self, input: CreateVenue) -> AppResult<Venue> {
        let venue = self.repo.create(input).await?;
        tracing::info!(venue_id = %venue.id, "Venue created");
        Ok(venue)
    }

    async fn update_venue(&self, id: Uuid, update: UpdateVenue) -> AppResult<Venue> {
        let mut venue = self.get_venue(id).await?;
        venue.apply(update);

        self.repo
            .update(venue)
            .await?
            .ok_or_else(|| AppError::not_found(VENUE_NOT_FOUND))
    }

    async fn delete_venue(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found(VENUE_NOT_FOUND));
        }
        tracing::info!(venue_id = %id, "Venue deleted");
        Ok(())
    }
}

//! Event service - event CRUD plus the venue and availability checks.
//!
//! Venue capacity comes from venue-service and seat counts from
//! attendee-service. Both are read on demand; nothing is cached.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    compute_registration_availability, day_bounds, CreateEvent, Event, RegistrationAvailability,
    UpdateEvent, VenueAvailability, VenueAvailabilityRequest,
};

use crate::client::{AttendeeServiceClient, VenueServiceClient};
use crate::repository::EventRepository;

const EVENT_NOT_FOUND: &str = "Event not found";
const VENUE_UNSUITABLE: &str = "Venue does not exist or has insufficient capacity";
const VENUE_BOOKED: &str = "Venue is already booked on this date";

/// Event service trait for dependency injection.
#[async_trait]
pub trait EventService: Send + Sync {
    async fn get_event(&self, id: Uuid) -> AppResult<Event>;

    /// Can `id` still take registrations?
    async fn registration_availability(&self, id: Uuid) -> AppResult<RegistrationAvailability>;

    /// Split venues into free and booked for one UTC day.
    async fn venue_availability(&self, request: VenueAvailabilityRequest) -> AppResult<VenueAvailability>;

    async fn organizer_events(&self, organizer_id: Uuid) -> AppResult<Vec<Event>>;

    async fn create_event(&self, organizer_id: Uuid, input: CreateEvent) -> AppResult<Event>;

    async fn update_event(&self, id: Uuid, organizer_id: Uuid, update: UpdateEvent) -> AppResult<Event>;

    async fn delete_event(&self, id: Uuid, organizer_id: Uuid) -> AppResult<()>;
}

/// Concrete [`EventService`].
pub struct EventManager {
    repo: Arc<dyn EventRepository>,
    venues: Arc<dyn VenueServiceClient>,
    attendees: Arc<dyn AttendeeServiceClient>,
}

impl EventManager {
    pub fn new(
        repo: Arc<dyn EventRepository>,
        venues: Arc<dyn VenueServiceClient>,
        attendees: Arc<dyn AttendeeServiceClient>,
    ) -> Self {
        Self {
            repo,
            venues,
            attendees,
        }
    }

    async fn find_event(&self, id: Uuid) -> AppResult<Event> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(EVENT_NOT_FOUND))
    }

    async fn find_owned_event(&self, id: Uuid, organizer_id: Uuid, action: &str) -> AppResult<Event> {
        let event = self.find_event(id).await?;
        if !event.is_owned_by(organizer_id) {
            return Err(AppError::forbidden(format!(
                "You don't have permission to {} this event",
                action
            )));
        }
        Ok(event)
    }

    /// The venue must exist and seat `capacity`. An unreachable venue
    /// service surfaces as 503 rather than a validation error.
    async fn ensure_venue_fits(&self, venue_id: Uuid, capacity: i32) -> AppResult<()> {
        match self.venues.get_venue(venue_id).await? {
            Some(venue) if venue.can_host(capacity) => Ok(()),
            Some(venue) => {
                tracing::debug!(%venue_id, venue_capacity = venue.capacity, capacity, "Venue too small");
                Err(AppError::validation(VENUE_UNSUITABLE))
            }
            None => Err(AppError::validation(VENUE_UNSUITABLE)),
        }
    }

    /// No other event may use `venue_id` on the UTC day of `date`.
    async fn ensure_venue_free(
        &self,
        venue_id: Uuid,
        date: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let (from, until) = day_bounds(date);
        let booked = self
            .repo
            .find_booked_venues(&[venue_id], from, until, exclude)
            .await?;

        if booked.is_empty() {
            Ok(())
        } else {
            Err(AppError::conflict(VENUE_BOOKED))
        }
    }
}

#[async_trait]
impl EventService for EventManager {
    async fn get_event(&self, id: Uuid) -> AppResult<Event> {
        self.find_event(id).await
    }

    async fn registration_availability(&self, id: Uuid) -> AppResult<RegistrationAvailability> {
        let event = self.find_event(id).await?;
        let now = Utc::now();

        if event.is_past(now) {
            return Ok(compute_registration_availability(&event, 0, now));
        }

        let count = self.attendees.registration_count(id).await?;
        Ok(compute_registration_availability(&event, count, now))
    }

    async fn venue_availability(&self, request: VenueAvailabilityRequest) -> AppResult<VenueAvailability> {
        if request.venue_ids.is_empty() {
            return Err(AppError::validation("venueIds must be a non-empty array"));
        }

        let (from, until) = day_bounds(request.date);
        let booked: HashSet<Uuid> = self
            .repo
            .find_booked_venues(&request.venue_ids, from, until, None)
            .await?
            .into_iter()
            .collect();

        let mut available_venue_ids = Vec::new();
        let mut booked_venue_ids = Vec::new();
        for id in request.venue_ids {
            if booked.contains(&id) {
                if !booked_venue_ids.contains(&id) {
                    booked_venue_ids.push(id);
                }
            } else if !available_venue_ids.contains(&id) {
                available_venue_ids.push(id);
            }
        }

        Ok(VenueAvailability {
            available_venue_ids,
            booked_venue_ids,
            date: from,
        })
    }

    async fn organizer_events(&self, organizer_id: Uuid) -> AppResult<Vec<Event>> {
        self.repo.list_by_organizer(organizer_id).await
    }

    async fn create_event(&self, organizer_id: Uuid, input: CreateEvent) -> AppResult<Event> {
        self.ensure_venue_fits(input.venue_id, input.capacity).await?;
        self.ensure_venue_free(input.venue_id, input.date, None).await?;

        let event = self.repo.create(organizer_id, input).await?;
        tracing::info!(event_id = %event.id, %organizer_id, "Event created");
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, organizer_id: Uuid, update: UpdateEvent) -> AppResult<Event> {
        let current = self.find_owned_event(id, organizer_id, "update").await?;

        let recheck_venue = update.changes_venue_or_capacity(&current);
        let recheck_booking = update.changes_booking(&current);

        let mut event = current;
        event.apply(update);

        if recheck_venue {
            self.ensure_venue_fits(event.venue_id, event.capacity).await?;
        }
        if recheck_booking {
            self.ensure_venue_free(event.venue_id, event.date, Some(event.id)).await?;
        }

        let event = self.repo.update(event).await?;
        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    async fn delete_event(&self, id: Uuid, organizer_id: Uuid) -> AppResult<()> {
        self.find_owned_event(id, organizer_id, "delete").await?;

        let count = self.attendees.registration_count(id).await?;
        if count > 0 {
            return Err(AppError::validation("Cannot delete an event with registered attendees"));
        }

        self.repo.delete(id).await?;
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }
}

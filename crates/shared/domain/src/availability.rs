//! Availability contracts exchanged between services.
//!
//! Registration availability is derived on demand from the event capacity and
//! the attendee service's seat count. Nothing is reserved or locked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

pub const REASON_PASSED: &str = "Event has already passed";
pub const REASON_OPEN: &str = "Registration open";
pub const REASON_FULL: &str = "Event is full";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAvailability {
    pub available: bool,
    pub reason: String,
    pub current_registrations: i64,
    pub max_capacity: i64,
    pub remaining_spots: i64,
}

/// Decide whether `event` still accepts registrations.
///
/// `count` is the number of seat-occupying registrations. It is ignored for
/// past events, which always report zero registrations and zero spots.
pub fn compute_registration_availability(
    event: &Event,
    count: i64,
    now: DateTime<Utc>,
) -> RegistrationAvailability {
    let max_capacity = i64::from(event.capacity);

    if event.is_past(now) {
        return RegistrationAvailability {
            available: false,
            reason: REASON_PASSED.to_string(),
            current_registrations: 0,
            max_capacity,
            remaining_spots: 0,
        };
    }

    let remaining = max_capacity - count;
    let available = remaining > 0;

    RegistrationAvailability {
        available,
        reason: if available { REASON_OPEN } else { REASON_FULL }.to_string(),
        current_registrations: count,
        max_capacity,
        remaining_spots: remaining.max(0),
    }
}

/// Number of seat-occupying registrations for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCount {
    pub event_id: Uuid,
    pub count: i64,
}

/// Which of these venues are free on the UTC day of `date`?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VenueAvailabilityRequest {
    pub venue_ids: Vec<Uuid>,
    pub date: DateTime<Utc>,
}

/// Answer to [`VenueAvailabilityRequest`]. `date` is the start of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VenueAvailability {
    pub available_venue_ids: Vec<Uuid>,
    pub booked_venue_ids: Vec<Uuid>,
    pub date: DateTime<Utc>,
}

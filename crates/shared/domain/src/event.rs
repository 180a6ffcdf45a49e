//! Event domain entity.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event hosted by an organizer at a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue_id: Uuid,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.organizer_id == user_id
    }

    /// Merge a partial update into this event.
    pub fn apply(&mut self, update: UpdateEvent) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(venue_id) = update.venue_id {
            self.venue_id = venue_id;
        }
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
    }
}

/// Data required to create an event. The organizer comes from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue_id: Uuid,
    pub capacity: i32,
    pub price: f64,
}

/// Partial event update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue_id: Option<Uuid>,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
}

impl UpdateEvent {
    /// Whether the venue capacity check has to run again.
    pub fn changes_venue_or_capacity(&self, current: &Event) -> bool {
        self.venue_id.is_some_and(|v| v != current.venue_id)
            || self.capacity.is_some_and(|c| c != current.capacity)
    }

    /// Whether the double-booking check has to run again.
    pub fn changes_booking(&self, current: &Event) -> bool {
        self.venue_id.is_some_and(|v| v != current.venue_id)
            || self
                .date
                .is_some_and(|d| day_start(d) != day_start(current.date))
    }
}

/// Midnight UTC of the calendar day containing `date`.
pub fn day_start(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Half-open `[start, end)` range covering the UTC day of `date`.
pub fn day_bounds(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day_start(date);
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> Event {
        let date = Utc.with_ymd_and_hms(2030, 5, 1, 18, 30, 0).unwrap();
        Event {
            id: Uuid::new_v4(),
            title: "RustConf".into(),
            description: "Talks".into(),
            date,
            venue_id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            capacity: 100,
            price: 25.0,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn day_bounds_cover_whole_utc_day() {
        let (start, end) = day_bounds(Utc.with_ymd_and_hms(2030, 5, 1, 23, 59, 59).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2030, 5, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn same_day_reschedule_keeps_booking() {
        let current = event();
        let update = UpdateEvent {
            date: Some(Utc.with_ymd_and_hms(2030, 5, 1, 9, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!update.changes_booking(&current));

        let update = UpdateEvent {
            date: Some(Utc.with_ymd_and_hms(2030, 5, 2, 9, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(update.changes_booking(&current));
    }

    #[test]
    fn unchanged_values_do_not_trigger_checks() {
        let current = event();
        let update = UpdateEvent {
            venue_id: Some(current.venue_id),
            capacity: Some(current.capacity),
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(!update.changes_venue_or_capacity(&current));
        assert!(!update.changes_booking(&current));

        let bigger = UpdateEvent {
            capacity: Some(500),
            ..Default::default()
        };
        assert!(bigger.changes_venue_or_capacity(&current));
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut current = event();
        let original = current.clone();
        current.apply(UpdateEvent {
            price: Some(0.0),
            ..Default::default()
        });

        assert_eq!(current.price, 0.0);
        assert_eq!(current.title, original.title);
        assert_eq!(current.capacity, original.capacity);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(event()).unwrap();
        assert!(json.get("venueId").is_some());
        assert!(json.get("organizerId").is_some());
    }
}

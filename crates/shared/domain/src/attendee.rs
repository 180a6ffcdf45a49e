//! Event registrations.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{TICKET_PREFIX, TICKET_SUFFIX_LENGTH};
use crate::error::DomainError;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendeeStatus {
    Registered,
    Attended,
    Cancelled,
    Refunded,
}

impl AttendeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeStatus::Registered => "REGISTERED",
            AttendeeStatus::Attended => "ATTENDED",
            AttendeeStatus::Cancelled => "CANCELLED",
            AttendeeStatus::Refunded => "REFUNDED",
        }
    }

    /// Statuses that occupy a seat.
    pub const ACTIVE: [AttendeeStatus; 2] = [AttendeeStatus::Registered, AttendeeStatus::Attended];
}

impl std::str::FromStr for AttendeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTERED" => Ok(AttendeeStatus::Registered),
            "ATTENDED" => Ok(AttendeeStatus::Attended),
            "CANCELLED" => Ok(AttendeeStatus::Cancelled),
            "REFUNDED" => Ok(AttendeeStatus::Refunded),
            other => Err(DomainError::validation(format!("Invalid attendee status: {}", other))),
        }
    }
}

impl std::fmt::Display for AttendeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's registration to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub ticket_number: String,
    pub status: AttendeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Build a ticket number `TKT-<unix millis>-<6 uppercase base36 chars>`.
pub fn generate_ticket_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TICKET_SUFFIX_LENGTH)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", TICKET_PREFIX, now.timestamp_millis(), suffix)
}

//! Venue domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Whether a venue can currently be booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueStatus {
    #[default]
    Active,
    Inactive,
}

impl VenueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueStatus::Active => "ACTIVE",
            VenueStatus::Inactive => "INACTIVE",
        }
    }
}

impl std::str::FromStr for VenueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(VenueStatus::Active),
            "INACTIVE" => Ok(VenueStatus::Inactive),
            other => Err(DomainError::validation(format!("Invalid venue status: {}", other))),
        }
    }
}

impl std::fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub status: VenueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// A venue fits an event when it can seat at least `capacity` people.
    pub fn can_host(&self, capacity: i32) -> bool {
        self.capacity >= capacity
    }

    pub fn apply(&mut self, update: UpdateVenue) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVenue {
    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub status: VenueStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<VenueStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_and_defaults_to_active() {
        assert_eq!("INACTIVE".parse::<VenueStatus>().unwrap(), VenueStatus::Inactive);
        assert!("closed".parse::<VenueStatus>().is_err());
        assert_eq!(VenueStatus::default(), VenueStatus::Active);
    }

    #[test]
    fn can_host_is_inclusive() {
        let now = Utc::now();
        let venue = Venue {
            id: Uuid::new_v4(),
            name: "Hall".into(),
            address: "1 Main St".into(),
            capacity: 100,
            status: VenueStatus::Active,
            created_at: now,
            updated_at: now,
        };
        assert!(venue.can_host(100));
        assert!(!venue.can_host(101));
    }
}

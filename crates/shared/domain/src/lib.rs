//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Every service shares these types, and the availability contracts double as
//! the JSON bodies exchanged between services.

pub mod attendee;
pub mod availability;
pub mod constants;
pub mod error;
pub mod event;
pub mod notification;
pub mod password;
pub mod user;
pub mod venue;

pub use attendee::{generate_ticket_number, Attendee, AttendeeStatus};
pub use availability::{
    compute_registration_availability, RegistrationAvailability, RegistrationCount,
    VenueAvailability, VenueAvailabilityRequest,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use event::{day_bounds, day_start, CreateEvent, Event, UpdateEvent};
pub use notification::{NotificationMessage, UserRegistered};
pub use password::Password;
pub use user::{join_roles, parse_roles, split_roles, User, UserResponse, UserRole};
pub use venue::{CreateVenue, UpdateVenue, Venue, VenueStatus};

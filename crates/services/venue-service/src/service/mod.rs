//! Service layer - business logic.

mod venue_service;

pub use venue_service::{VenueManager, VenueService};

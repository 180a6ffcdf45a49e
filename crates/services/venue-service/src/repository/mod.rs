//! Repository layer for data access.

pub mod entities;
mod venue_repository;

pub use venue_repository::{VenueRepository, VenueStore};

#[cfg(any(test, feature = "test-utils"))]
pub use venue_repository::MockVenueRepository;

//! Repository layer for data access.

pub mod entities;
mod event_repository;

pub use event_repository::{EventRepository, EventStore};

#[cfg(any(test, feature = "test-utils"))]
pub use event_repository::MockEventRepository;

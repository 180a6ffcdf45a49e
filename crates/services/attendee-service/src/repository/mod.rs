//! Repository layer for data access.

pub mod entities;
mod attendee_repository;

pub use attendee_repository::{AttendeeRepository, AttendeeStore};
pub(crate) use attendee_repository::ALREADY_REGISTERED;

#[cfg(any(test, feature = "test-utils"))]
pub use attendee_repository::MockAttendeeRepository;

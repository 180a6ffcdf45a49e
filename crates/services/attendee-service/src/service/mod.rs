//! Service layer - business logic.

mod attendee_service;

pub use attendee_service::{AttendeeManager, AttendeeService, RegistrationStatus};

//! Service layer - business logic.

mod event_service;

pub use event_service::{EventManager, EventService};

//! SeaORM entities.

pub mod attendee;

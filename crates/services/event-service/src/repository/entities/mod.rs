//! SeaORM entities.

pub mod event;

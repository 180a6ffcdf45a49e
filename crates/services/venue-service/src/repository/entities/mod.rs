//! SeaORM entities.

pub mod venue;

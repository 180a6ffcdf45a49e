//! HTTP clients for sibling services.

mod attendee_client;
mod venue_client;

pub use attendee_client::{AttendeeClient, AttendeeServiceClient};
pub use venue_client::{VenueClient, VenueServiceClient};

#[cfg(any(test, feature = "test-utils"))]
pub use attendee_client::MockAttendeeServiceClient;
#[cfg(any(test, feature = "test-utils"))]
pub use venue_client::MockVenueServiceClient;

//! HTTP clients for sibling services.

mod event_client;

pub use event_client::{EventClient, EventServiceClient};

#[cfg(any(test, feature = "test-utils"))]
pub use event_client::MockEventServiceClient;

//! OpenAPI documentation.

use utoipa::OpenApi;

use common::openapi::SecurityAddon;
use domain::{Event, RegistrationAvailability, VenueAvailability};

use crate::handlers::event_handler::{CreateEventRequest, UpdateEventRequest, VenueAvailabilityBody};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::event_handler::get_event,
        crate::handlers::event_handler::registration_availability,
        crate::handlers::event_handler::venue_availability,
        crate::handlers::event_handler::organizer_events,
        crate::handlers::event_handler::create_event,
        crate::handlers::event_handler::update_event,
        crate::handlers::event_handler::delete_event,
    ),
    components(schemas(
        Event,
        CreateEventRequest,
        UpdateEventRequest,
        VenueAvailabilityBody,
        VenueAvailability,
        RegistrationAvailability
    )),
    modifiers(&SecurityAddon),
    tags((name = "Events", description = "Event management and availability checks"))
)]
pub struct ApiDoc;

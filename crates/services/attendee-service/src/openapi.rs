//! OpenAPI documentation.

use utoipa::OpenApi;

use common::openapi::SecurityAddon;
use domain::{Attendee, AttendeeStatus, RegistrationCount};

use crate::handlers::attendee_handler::{CheckInRequest, RegisterRequest};
use crate::service::RegistrationStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::attendee_handler::register,
        crate::handlers::attendee_handler::user_events,
        crate::handlers::attendee_handler::registration_status,
        crate::handlers::attendee_handler::cancel_registration,
        crate::handlers::attendee_handler::event_attendees,
        crate::handlers::attendee_handler::check_in,
        crate::handlers::attendee_handler::find_ticket,
        crate::handlers::attendee_handler::registration_count,
    ),
    components(schemas(
        Attendee,
        AttendeeStatus,
        RegisterRequest,
        CheckInRequest,
        RegistrationStatus,
        RegistrationCount
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendees", description = "Registrations, cancellation and check-in"),
        (name = "Internal", description = "Calls between services")
    )
)]
pub struct ApiDoc;

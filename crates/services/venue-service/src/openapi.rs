//! OpenAPI documentation.

use utoipa::OpenApi;

use common::openapi::SecurityAddon;
use domain::{Venue, VenueStatus};

use crate::handlers::venue_handler::{CreateVenueRequest, UpdateVenueRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::venue_handler::list_venues,
        crate::handlers::venue_handler::available_venues,
        crate::handlers::venue_handler::get_venue,
        crate::handlers::venue_handler::create_venue,
        crate::handlers::venue_handler::update_venue,
        crate::handlers::venue_handler::delete_venue,
    ),
    components(schemas(Venue, VenueStatus, CreateVenueRequest, UpdateVenueRequest)),
    modifiers(&SecurityAddon),
    tags((name = "Venues", description = "Venue catalogue and availability search"))
)]
pub struct ApiDoc;

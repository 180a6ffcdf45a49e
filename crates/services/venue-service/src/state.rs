//! Application state for dependency injection.

use std::sync::Arc;

use common::TokenKeys;
use sea_orm::DatabaseConnection;

use crate::service::VenueService;

#[derive(Clone)]
pub struct AppState {
    pub venue_service: Arc<dyn VenueService>,
    pub token_keys: Arc<TokenKeys>,
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        venue_service: Arc<dyn VenueService>,
        token_keys: Arc<TokenKeys>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            venue_service,
            token_keys,
            db,
        }
    }
}

//! Application state for dependency injection.

use std::sync::Arc;

use common::TokenKeys;
use sea_orm::DatabaseConnection;

use crate::service::EventService;

#[derive(Clone)]
pub struct AppState {
    pub event_service: Arc<dyn EventService>,
    pub token_keys: Arc<TokenKeys>,
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        event_service: Arc<dyn EventService>,
        token_keys: Arc<TokenKeys>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            event_service,
            token_keys,
            db,
        }
    }
}

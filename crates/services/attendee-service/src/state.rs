//! Application state for dependency injection.

use std::sync::Arc;

use common::TokenKeys;
use sea_orm::DatabaseConnection;

use crate::service::AttendeeService;

#[derive(Clone)]
pub struct AppState {
    pub attendee_service: Arc<dyn AttendeeService>,
    pub token_keys: Arc<TokenKeys>,
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        attendee_service: Arc<dyn AttendeeService>,
        token_keys: Arc<TokenKeys>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            attendee_service,
            token_keys,
            db,
        }
    }
}

//! Application state for dependency injection.

use std::sync::Arc;

use common::TokenKeys;
use sea_orm::DatabaseConnection;

use crate::service::AuthService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    /// Access-token keys for the auth middleware
    pub token_keys: Arc<TokenKeys>,
    /// Pinged by `/health`; absent in router tests
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        token_keys: Arc<TokenKeys>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            auth_service,
            token_keys,
            db,
        }
    }
}

//! Application state for dependency injection.

use std::sync::Arc;

use crate::proxy::Proxy;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<Proxy>,
}

impl AppState {
    pub fn new(proxy: Arc<Proxy>) -> Self {
        Self { proxy }
    }
}

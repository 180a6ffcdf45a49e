//! Catch-all handler forwarding to the backends.

use axum::{extract::{Request, State}, response::Response};

use common::AppResult;

use crate::state::AppState;

pub async fn proxy_request(State(state): State<AppState>, request: Request) -> AppResult<Response> {
    state.proxy.forward(request).await
}

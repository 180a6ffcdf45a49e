//! API Gateway Library
//!
//! Single public entry point. Requests are routed by path prefix to the
//! backend services over plain HTTP; the gateway itself holds no business
//! logic and performs no authentication.

pub mod config;
pub mod handlers;
pub mod proxy;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::GatewayConfig;
use crate::proxy::Proxy;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(host, port, GatewayConfig::from_env()).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let upstreams = config.upstreams();
    for upstream in &upstreams {
        info!("{} -> {} ({})", upstream.prefix, upstream.base_url, upstream.name);
    }

    let proxy = Proxy::new(upstreams, config.http, config.health_timeout)?;
    let app = create_router(AppState::new(Arc::new(proxy)));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Notification Service Library
//!
//! Reads the notification stream through a consumer group and sends the
//! matching emails. HTTP only serves health and info.

pub mod config;
pub mod consumer;
pub mod email;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use common::messaging::{self, StreamConsumer};
use domain::{USER_REGISTERED_GROUP, USER_REGISTERED_STREAM};

use crate::config::NotificationServiceConfig;
use crate::consumer::NotificationHandler;
use crate::email::LoggingEmailSender;
use crate::routes::create_router;

pub const SERVICE_NAME: &str = "notification-service";

/// Run the notification service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = NotificationServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: NotificationServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = tokio::time::timeout(Duration::from_secs(5), messaging::connect(&config.redis_url))
        .await
        .map_err(|_| "Redis connection timed out")??;
    info!("Connected to Redis at {}", config.redis_url);

    let consumer = StreamConsumer::new(
        conn,
        USER_REGISTERED_STREAM,
        USER_REGISTERED_GROUP,
        config.consumer_name.clone(),
    );
    consumer.ensure_group().await?;

    let handler = NotificationHandler::new(Arc::new(LoggingEmailSender::new(config.mail_from)));
    tokio::spawn(async move {
        if let Err(e) = consumer.run(handler).await {
            error!(error = %e, "Notification consumer stopped");
        }
    });

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Notification service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router()).await?;

    Ok(())
}

//! Combined binary for development - runs every service in one process.

use std::future::Future;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::MigrateAction;

#[derive(Parser)]
#[command(name = "event-platform")]
#[command(about = "Combined event platform binary for development")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all services in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "3000")]
        gateway_port: u16,
        #[arg(long, default_value = "3001")]
        auth_port: u16,
        #[arg(long, default_value = "3002")]
        event_port: u16,
        #[arg(long, default_value = "3003")]
        venue_port: u16,
        #[arg(long, default_value = "3004")]
        attendee_port: u16,
        #[arg(long, default_value = "3005")]
        notification_port: u16,
    },
    /// Run database migrations for all services
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset databases and run all migrations
    Fresh,
}

/// Spawn one component; a startup or runtime error is logged.
fn spawn<F>(name: &'static str, server: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), Box<dyn std::error::Error>>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("{} failed: {}", name, e);
        }
    })
}

async fn pause() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            gateway_port,
            auth_port,
            event_port,
            venue_port,
            attendee_port,
            notification_port,
        } => {
            info!("Starting combined services in development mode");
            info!("  Gateway:              http://{}:{}", host, gateway_port);
            info!("  Auth service:         http://{}:{}", host, auth_port);
            info!("  Event service:        http://{}:{}", host, event_port);
            info!("  Venue service:        http://{}:{}", host, venue_port);
            info!("  Attendee service:     http://{}:{}", host, attendee_port);
            info!("  Notification service: http://{}:{}", host, notification_port);

            let h = host.clone();
            let auth = spawn("Auth service", async move {
                auth_service_lib::run_embedded(&h, auth_port).await
            });
            pause().await;

            let h = host.clone();
            let venue = spawn("Venue service", async move {
                venue_service_lib::run_embedded(&h, venue_port).await
            });
            pause().await;

            let h = host.clone();
            let event = spawn("Event service", async move {
                event_service_lib::run_embedded(&h, event_port).await
            });
            pause().await;

            let h = host.clone();
            let attendee = spawn("Attendee service", async move {
                attendee_service_lib::run_embedded(&h, attendee_port).await
            });
            pause().await;

            let h = host.clone();
            let notification = spawn("Notification service", async move {
                notification_service_lib::run_embedded(&h, notification_port).await
            });
            pause().await;

            let h = host.clone();
            let gateway = spawn("Gateway", async move {
                gateway_lib::run_embedded(&h, gateway_port).await
            });

            // Any component exiting means it failed.
            tokio::select! {
                _ = auth => error!("Auth service exited unexpectedly"),
                _ = venue => error!("Venue service exited unexpectedly"),
                _ = event => error!("Event service exited unexpectedly"),
                _ = attendee => error!("Attendee service exited unexpectedly"),
                _ = notification => error!("Notification service exited unexpectedly"),
                _ = gateway => error!("Gateway exited unexpectedly"),
            }
        }
        Commands::Migrate { action } => {
            let action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };

            // Fresh drops every table of the target database, so it expects
            // one database per service (the default URLs).
            info!("Migrating auth-service");
            auth_service_lib::run_migrations(action).await?;
            info!("Migrating venue-service");
            venue_service_lib::run_migrations(action).await?;
            info!("Migrating event-service");
            event_service_lib::run_migrations(action).await?;
            info!("Migrating attendee-service");
            attendee_service_lib::run_migrations(action).await?;
        }
    }

    Ok(())
}

//! Notification service configuration.

use common::{env_or, env_parse_or, ConfigError};

#[derive(Debug, Clone)]
pub struct NotificationServiceConfig {
    pub redis_url: String,
    /// Sender address shown on outgoing mail
    pub mail_from: String,
    /// Consumer name inside the group; unique per process
    pub consumer_name: String,
    pub host: String,
    pub port: u16,
}

impl NotificationServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            redis_url: env_or(
                &["NOTIFICATION_SERVICE_REDIS_URL", "REDIS_URL"],
                "redis://127.0.0.1:6379",
            ),
            mail_from: env_or(&["SMTP_FROM", "SMTP_USER"], "noreply@events.local"),
            consumer_name: env_or(
                &["NOTIFICATION_CONSUMER_NAME"],
                &format!("notification-{}", uuid::Uuid::new_v4().simple()),
            ),
            host: env_or(&["NOTIFICATION_SERVICE_HOST"], "0.0.0.0"),
            port: env_parse_or(&["NOTIFICATION_SERVICE_PORT"], 3005),
        })
    }
}

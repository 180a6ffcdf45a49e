//! Stream handler for notification messages.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use common::messaging::MessageHandler;
use common::{AppError, AppResult};
use domain::NotificationMessage;

use crate::email::{welcome_email, EmailSender};

/// Turns stream payloads into outgoing mail.
pub struct NotificationHandler {
    sender: Arc<dyn EmailSender>,
}

impl NotificationHandler {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl MessageHandler for NotificationHandler {
    async fn handle(&self, payload: &str) -> AppResult<()> {
        let raw: Value = serde_json::from_str(payload)
            .map_err(|e| AppError::bad_request(format!("Unparsable notification payload: {}", e)))?;

        let message = match serde_json::from_value::<NotificationMessage>(raw.clone()) {
            Ok(message) => message,
            Err(e) => {
                let kind = raw.get("type").and_then(Value::as_str).unwrap_or("<missing>");
                warn!(kind, error = %e, "Unknown notification message, dropping");
                return Ok(());
            }
        };

        match message {
            NotificationMessage::UserRegistered(user) => {
                info!(email = %user.email, "Sending welcome email");
                self.sender.send(welcome_email(&user)).await
            }
        }
    }
}

//! Messages published to the notification queue.

use serde::{Deserialize, Serialize};

/// Envelope `{ "type": ..., "data": ... }` carried on the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationMessage {
    UserRegistered(UserRegistered),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub name: String,
    pub email: String,
}

impl NotificationMessage {
    pub fn user_registered(name: impl Into<String>, email: impl Into<String>) -> Self {
        NotificationMessage::UserRegistered(UserRegistered {
            name: name.into(),
            email: email.into(),
        })
    }

    /// Wire name of the message type.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationMessage::UserRegistered(_) => "USER_REGISTERED",
        }
    }
}

//! Outgoing mail.
//!
//! Only a logging sender exists: messages are written to the log instead of
//! being delivered over SMTP.

use async_trait::async_trait;
use tracing::info;

use common::AppResult;
use domain::notification::UserRegistered;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Characters of the body included in the log line.
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    /// First [`PREVIEW_CHARS`] characters of the body, whitespace collapsed.
    pub fn preview(&self) -> String {
        let flat = self.html.split_whitespace().collect::<Vec<_>>().join(" ");
        match flat.char_indices().nth(PREVIEW_CHARS) {
            Some((idx, _)) => format!("{}...", &flat[..idx]),
            None => flat,
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: Email) -> AppResult<()>;
}

/// [`EmailSender`] that only logs.
pub struct LoggingEmailSender {
    from: String,
}

impl LoggingEmailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, email: Email) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            body = %email.preview(),
            "Email sent (logging sender)"
        );
        Ok(())
    }
}

/// Welcome mail for a freshly registered user.
pub fn welcome_email(user: &UserRegistered) -> Email {
    Email {
        to: user.email.clone(),
        subject: "Welcome to the Event Platform".to_string(),
        html: format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>Welcome aboard!</h1>
  <h2>Hello {name}!</h2>
  <p>Thank you for joining. You can now discover events, register for them and keep track of your tickets.</p>
  <ul>
    <li><strong>Discover events:</strong> browse and register for upcoming events</li>
    <li><strong>Manage attendance:</strong> keep track of your registrations</li>
    <li><strong>Stay updated:</strong> receive notifications about your events</li>
  </ul>
</div>"#,
            name = user.name
        ),
    }
}

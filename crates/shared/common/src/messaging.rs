//! Redis Streams messaging.
//!
//! Publishers XADD a single `payload` field holding JSON. Consumers read
//! through a consumer group and acknowledge every entry once the handler has
//! returned, whether it succeeded or not. Failed entries are logged and dropped.

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    aio::ConnectionManager,
    streams::{StreamId, StreamReadOptions, StreamReadReply},
    AsyncCommands, RedisError, RedisResult,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Field carrying the JSON body of each stream entry.
pub const PAYLOAD_FIELD: &str = "payload";

/// Open a managed Redis connection.
pub async fn connect(url: &str) -> Result<ConnectionManager, RedisError> {
    let client = redis::Client::open(url)?;
    ConnectionManager::new(client).await
}

/// Publishes JSON messages to a named stream.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Append a JSON payload to `stream` and return the entry id.
    async fn publish_json(&self, stream: &str, payload: String) -> AppResult<String>;
}

/// Serialize and publish any message.
pub async fn publish<T: Serialize + Sync>(
    publisher: &dyn MessagePublisher,
    stream: &str,
    message: &T,
) -> AppResult<String> {
    let payload = serde_json::to_string(message)
        .map_err(|e| AppError::internal(format!("Message serialization failed: {}", e)))?;
    publisher.publish_json(stream, payload).await
}

/// [`MessagePublisher`] backed by XADD.
#[derive(Clone)]
pub struct RedisStreamPublisher {
    conn: ConnectionManager,
}

impl RedisStreamPublisher {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        Ok(Self::new(connect(url).await?))
    }
}

#[async_trait]
impl MessagePublisher for RedisStreamPublisher {
    async fn publish_json(&self, stream: &str, payload: String) -> AppResult<String> {
        let mut conn = self.conn.clone();
        let id: String = conn.xadd(stream, "*", &[(PAYLOAD_FIELD, payload)]).await?;
        tracing::debug!(stream = %stream, entry_id = %id, "Published message");
        Ok(id)
    }
}

/// Processes one stream payload.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &str) -> AppResult<()>;
}

/// What happened to a single entry. Every outcome is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Handled,
    Failed(String),
    MissingPayload,
}

/// Run `handler` on one entry.
pub async fn dispatch(handler: &dyn MessageHandler, entry: &StreamId) -> Delivery {
    let Some(payload) = entry.get::<String>(PAYLOAD_FIELD) else {
        tracing::warn!(entry_id = %entry.id, "Stream entry without payload, dropping");
        return Delivery::MissingPayload;
    };

    match handler.handle(&payload).await {
        Ok(()) => Delivery::Handled,
        Err(e) => {
            tracing::error!(entry_id = %entry.id, error = %e, "Message handler failed, dropping");
            Delivery::Failed(e.to_string())
        }
    }
}

/// Consumer-group reader for a single stream.
pub struct StreamConsumer {
    conn: ConnectionManager,
    stream: String,
    group: String,
    consumer: String,
    batch_size: usize,
    block: Duration,
}

impl StreamConsumer {
    pub fn new(
        conn: ConnectionManager,
        stream: impl Into<String>,
        group: impl Into<String>,
        consumer: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            stream: stream.into(),
            group: group.into(),
            consumer: consumer.into(),
            batch_size: 10,
            block: Duration::from_secs(5),
        }
    }

    /// Create the group (and the stream) if missing.
    pub async fn ensure_group(&self) -> RedisResult<()> {
        let mut conn = self.conn.clone();
        let created: RedisResult<()> = conn
            .xgroup_create_mkstream(&self.stream, &self.group, "0")
            .await;

        match created {
            Ok(()) => {
                tracing::info!(stream = %self.stream, group = %self.group, "Created consumer group");
                Ok(())
            }
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Read and process one batch. Returns how many entries were acknowledged.
    pub async fn poll_once(&self, handler: &dyn MessageHandler) -> RedisResult<usize> {
        let mut conn = self.conn.clone();
        let opts = StreamReadOptions::default()
            .group(&self.group, &self.consumer)
            .count(self.batch_size)
            .block(self.block.as_millis() as usize);

        let reply: StreamReadReply = conn
            .xread_options(&[&self.stream], &[">"], &opts)
            .await?;

        let mut acked = 0;
        for key in reply.keys {
            for entry in key.ids {
                dispatch(handler, &entry).await;
                let _: i64 = conn.xack(&self.stream, &self.group, &[&entry.id]).await?;
                acked += 1;
            }
        }

        Ok(acked)
    }

    /// Consume forever. Read errors are logged and retried after a pause.
    pub async fn run(self, handler: impl MessageHandler) -> RedisResult<()> {
        self.ensure_group().await?;
        tracing::info!(
            stream = %self.stream,
            group = %self.group,
            consumer = %self.consumer,
            "Waiting for messages"
        );

        loop {
            if let Err(e) = self.poll_once(&handler).await {
                tracing::error!(error = %e, stream = %self.stream, "Stream read failed");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry(fields: &[(&str, &str)]) -> StreamId {
        StreamId {
            id: "1-0".into(),
            map: fields
                .iter()
                .map(|(k, v)| (k.to_string(), redis::Value::BulkString(v.as_bytes().to_vec())))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn dispatch_passes_payload_to_handler() {
        let mut handler = MockMessageHandler::new();
        handler
            .expect_handle()
            .withf(|p| p == r#"{"type":"USER_REGISTERED"}"#)
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatch(&handler, &entry(&[(PAYLOAD_FIELD, r#"{"type":"USER_REGISTERED"}"#)])).await;
        assert_eq!(outcome, Delivery::Handled);
    }

    #[tokio::test]
    async fn handler_failure_is_reported_not_propagated() {
        let mut handler = MockMessageHandler::new();
        handler
            .expect_handle()
            .returning(|_| Err(AppError::validation("bad payload")));

        let outcome = dispatch(&handler, &entry(&[(PAYLOAD_FIELD, "{}")])).await;
        assert_eq!(outcome, Delivery::Failed("bad payload".into()));
    }

    #[tokio::test]
    async fn entry_without_payload_skips_handler() {
        let mut handler = MockMessageHandler::new();
        handler.expect_handle().times(0);

        let outcome = dispatch(&handler, &entry(&[("other", "x")])).await;
        assert_eq!(outcome, Delivery::MissingPayload);
    }

    #[tokio::test]
    async fn publish_serializes_message() {
        let mut publisher = MockMessagePublisher::new();
        publisher
            .expect_publish_json()
            .withf(|stream, payload| {
                stream == "email_notifications:user.registered"
                    && payload.contains(r#""type":"USER_REGISTERED""#)
            })
            .returning(|_, _| Ok("1-0".into()));

        let message = domain::NotificationMessage::user_registered("Jane", "jane@example.com");
        let id = publish(&publisher, domain::USER_REGISTERED_STREAM, &message)
            .await
            .unwrap();
        assert_eq!(id, "1-0");
    }
}

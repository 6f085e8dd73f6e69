//! Bridge availability reporting.

use std::fmt;

use generator_common::{AVAILABILITY_OFFLINE, AVAILABILITY_ONLINE};

use crate::Result;
use crate::publisher::MessageSink;

/// Availability of a bridge as seen by subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    /// Connected and publishing.
    Online,
    /// Shut down or disconnected.
    Offline,
}

impl BridgeStatus {
    /// Payload published on the availability topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeStatus::Online => AVAILABILITY_ONLINE,
            BridgeStatus::Offline => AVAILABILITY_OFFLINE,
        }
    }
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Helper to publish bridge availability on connect and shutdown.
///
/// The `offline` counterpart for ungraceful disconnects is the last will set
/// when the client is created.
#[derive(Debug, Clone)]
pub struct StatusPublisher<S> {
    sink: S,
    topic: String,
}

impl<S: MessageSink> StatusPublisher<S> {
    /// Create a new status publisher for `topic`.
    pub fn new(sink: S, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }

    /// The availability topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish a status.
    pub async fn publish(&self, status: BridgeStatus) -> Result<()> {
        self.sink
            .publish(&self.topic, status.as_str().as_bytes())
            .await?;
        tracing::debug!(topic = %self.topic, status = %status, "Published bridge status");
        Ok(())
    }

    /// Publish "online".
    pub async fn publish_online(&self) -> Result<()> {
        self.publish(BridgeStatus::Online).await
    }

    /// Publish "offline".
    pub async fn publish_offline(&self) -> Result<()> {
        self.publish(BridgeStatus::Offline).await
    }
}

//! MQTT publisher and the publish seam used by bridge workers.

use std::future::Future;

use rumqttc::{AsyncClient, QoS};

use generator_common::validate_publish_topic;

use crate::error::{BridgeError, Result};

/// Destination for outbound messages.
///
/// Bridge logic publishes through this trait so it can be driven without a
/// broker. [`Publisher`] is the MQTT implementation.
pub trait MessageSink {
    /// Publish `payload` to `topic`.
    fn publish(&self, topic: &str, payload: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

/// Publisher for sending messages to an MQTT broker.
///
/// Every message goes out with the same QoS and retain flag. The defaults
/// are at-least-once delivery and retained messages, so late subscribers see
/// the last value.
#[derive(Clone, Debug)]
pub struct Publisher {
    client: AsyncClient,
    qos: QoS,
    retain: bool,
}

impl Publisher {
    /// Create a new publisher.
    pub fn new(client: AsyncClient) -> Self {
        Self {
            client,
            qos: QoS::AtLeastOnce,
            retain: true,
        }
    }

    /// Get the QoS level.
    pub fn qos(&self) -> QoS {
        self.qos
    }

    /// Whether messages are retained.
    pub fn retain(&self) -> bool {
        self.retain
    }

    /// Publish raw bytes to a topic.
    pub async fn publish_raw(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        validate_publish_topic(topic)?;

        self.client
            .publish(topic, self.qos, self.retain, payload)
            .await
            .map_err(|e| BridgeError::Publish {
                topic: topic.to_string(),
                message: e.to_string(),
            })
    }

    /// Publish a plain-text payload.
    pub async fn publish_text(&self, topic: &str, text: &str) -> Result<()> {
        self.publish_raw(topic, text.as_bytes().to_vec()).await
    }
}

impl MessageSink for Publisher {
    fn publish(&self, topic: &str, payload: &[u8]) -> impl Future<Output = Result<()>> + Send {
        self.publish_raw(topic, payload.to_vec())
    }
}

/// Statistics from a publish cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishStats {
    /// Number of successfully published messages.
    pub success: usize,
    /// Number of failed publishes.
    pub failed: usize,
}

impl PublishStats {
    /// Total number of attempted publishes.
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

//! Publish-on-delta loop.
//!
//! The bridge owns the latest plug readings and what it last published. Each
//! evaluation computes every output (discovery documents, passthrough
//! readings, derived state) and publishes only those that changed.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use generator_bridge_framework::{InboundMessage, MessageSink, PublishStats, Result};

use crate::device::{OutputTopics, discovery_documents};
use crate::evaluator::{GeneratorState, evaluate_outputs};
use crate::tracker::{InputSlot, InputStore, PublishedOutputs};

/// A pending change to one outbound topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChange {
    pub topic: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Bridges plug telemetry to generator state.
#[derive(Debug)]
pub struct GeneratorBridge {
    topics: OutputTopics,
    /// Discovery config topic and serialized document.
    discovery: Vec<(String, String)>,
    inputs: InputStore,
    published: PublishedOutputs,
}

impl GeneratorBridge {
    /// Create a bridge with no readings and nothing published.
    pub fn new() -> Result<Self> {
        let topics = OutputTopics::new();
        let mut discovery = Vec::new();
        for (topic, doc) in discovery_documents(&topics) {
            discovery.push((topic, doc.to_json()?));
        }

        Ok(Self {
            topics,
            discovery,
            inputs: InputStore::new(),
            published: PublishedOutputs::new(),
        })
    }

    pub fn topics(&self) -> &OutputTopics {
        &self.topics
    }

    pub fn inputs(&self) -> &InputStore {
        &self.inputs
    }

    pub fn published(&self) -> &PublishedOutputs {
        &self.published
    }

    /// Record an inbound message.
    ///
    /// Returns `true` if it changed one of the inputs. Messages on unknown
    /// topics are logged and dropped.
    pub fn handle_message(&mut self, message: &InboundMessage) -> bool {
        let Some(slot) = InputSlot::from_topic(&message.topic) else {
            warn!(
                topic = %message.topic,
                payload = %message.payload_text(),
                "Unrecognized topic"
            );
            return false;
        };

        let value = message.payload_text();
        debug!(topic = %message.topic, value = %value, "Input received");
        self.inputs.set(slot, value.into_owned())
    }

    /// Every output with the value it should currently have.
    pub fn desired_outputs(&self) -> Vec<(&str, Option<&str>)> {
        let evaluation = evaluate_outputs(self.inputs.readings());

        let mut outputs: Vec<(&str, Option<&str>)> = self
            .discovery
            .iter()
            .map(|(topic, doc)| (topic.as_str(), Some(doc.as_str())))
            .collect();
        outputs.push((self.topics.voltage.as_str(), evaluation.voltage));
        outputs.push((self.topics.fan_wattage.as_str(), evaluation.wattage));
        outputs.push((self.topics.state.as_str(), Some(evaluation.state.as_str())));
        outputs
    }

    /// Outputs whose desired value differs from what was last published.
    pub fn pending_changes(&self) -> Vec<OutputChange> {
        self.desired_outputs()
            .into_iter()
            .filter(|(topic, value)| self.published.differs(topic, *value))
            .map(|(topic, value)| OutputChange {
                topic: topic.to_string(),
                from: self.published.get(topic).map(str::to_string),
                to: value.map(str::to_string),
            })
            .collect()
    }

    /// Publish every pending change through `sink`.
    ///
    /// A change is recorded only once its publish succeeds, so failures are
    /// retried on the next call.
    pub async fn publish_changes<S: MessageSink>(&mut self, sink: &S) -> PublishStats {
        let mut stats = PublishStats::default();

        for change in self.pending_changes() {
            let payload = change.to.as_deref().unwrap_or("");
            match sink.publish(&change.topic, payload.as_bytes()).await {
                Ok(()) => {
                    info!(
                        topic = %change.topic,
                        from = %change.from.as_deref().unwrap_or(""),
                        to = %payload,
                        "MQTT update"
                    );
                    if change.topic == self.topics.state
                        && change.to.as_deref() == Some(GeneratorState::Error.as_str())
                    {
                        let readings = self.inputs.readings();
                        warn!(
                            status = ?readings.status,
                            voltage = ?readings.voltage,
                            wattage = ?readings.wattage,
                            "Generator in error state"
                        );
                    }
                    self.published.record(&change.topic, change.to.as_deref());
                    stats.success += 1;
                }
                Err(e) => {
                    warn!(topic = %change.topic, error = %e, "Failed to publish update");
                    stats.failed += 1;
                }
            }
        }

        if stats.total() > 0 {
            debug!(
                published = stats.success,
                failed = stats.failed,
                "Publish cycle complete"
            );
        }

        stats
    }

    /// Run until the inbound channel closes.
    ///
    /// Outputs are re-evaluated right after each input change and on every
    /// tick of `poll_interval`. The first tick fires immediately.
    pub async fn run<S: MessageSink>(
        mut self,
        mut inbound: mpsc::Receiver<InboundMessage>,
        sink: S,
        poll_interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_ms = poll_interval.as_millis() as u64,
            "Generator bridge started"
        );

        loop {
            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else {
                        info!("Inbound channel closed, stopping generator bridge");
                        break;
                    };
                    if self.handle_message(&message) {
                        self.publish_changes(&sink).await;
                    }
                }
                _ = ticker.tick() => {
                    self.publish_changes(&sink).await;
                }
            }
        }
    }
}

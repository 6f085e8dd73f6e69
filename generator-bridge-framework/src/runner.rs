//! Bridge runner for lifecycle management.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Outgoing, Packet, QoS};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use generator_common::{LoggingConfig, TopicBuilder, connect, init_tracing};

use crate::BridgeArgs;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::inbound::InboundMessage;
use crate::publisher::Publisher;
use crate::status::StatusPublisher;

/// Capacity of the channel carrying inbound messages to the bridge worker.
const INBOUND_CHANNEL_CAPACITY: usize = 64;

/// How long shutdown waits for the offline status and disconnect to flush.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Bridge runner that manages the lifecycle of an MQTT bridge.
///
/// Handles:
/// - Logging initialization
/// - MQTT client creation with an `offline` last will
/// - (Re)subscribing and announcing `online` on every connect
/// - Forwarding inbound messages to the bridge worker
/// - Task spawning and management
/// - Graceful shutdown on Ctrl+C
///
/// # Example
///
/// ```ignore
/// use generator_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let args = BridgeArgs::parse_with_default("mybridge.json5");
///     let config = MyBridgeConfig::load(&args.config)?;
///
///     let mut runner = BridgeRunner::new_with_args("mybridge", config, Some(&args))?;
///     let inbound = runner.subscribe(["sensors/#"])?;
///     let publisher = runner.publisher();
///     runner.spawn(async move {
///         // Worker logic here
///     });
///
///     runner.run().await
/// }
/// ```
pub struct BridgeRunner<C: BridgeConfig> {
    /// Bridge name for logging.
    name: String,
    /// The loaded configuration.
    config: C,
    /// MQTT client handle.
    client: AsyncClient,
    /// MQTT event loop, polled by [`run`](Self::run).
    event_loop: EventLoop,
    /// Publisher for outbound messages.
    publisher: Publisher,
    /// Availability publisher.
    status: StatusPublisher<Publisher>,
    /// Topic filters subscribed on every connect.
    subscriptions: Vec<String>,
    /// Sender for inbound messages, set once [`subscribe`](Self::subscribe) is called.
    inbound_tx: Option<mpsc::Sender<InboundMessage>>,
    /// Spawned tasks.
    tasks: Vec<JoinHandle<()>>,
}

impl<C: BridgeConfig> BridgeRunner<C> {
    /// Create a new bridge runner.
    ///
    /// This will:
    /// 1. Initialize logging based on config
    /// 2. Create the MQTT client with its last will
    /// 3. Create the publishers
    pub fn new(name: impl Into<String>, config: C) -> Result<Self> {
        Self::new_with_args(name, config, None)
    }

    /// Create a new bridge runner with CLI args for log level override.
    pub fn new_with_args(
        name: impl Into<String>,
        config: C,
        args: Option<&BridgeArgs>,
    ) -> Result<Self> {
        let name = name.into();
        let version = env!("CARGO_PKG_VERSION").to_string();

        let log_config = match args.and_then(|a| a.log_level.as_ref()) {
            Some(level) => LoggingConfig {
                level: level.clone(),
                format: config.logging().format,
            },
            None => config.logging().clone(),
        };

        init_tracing(&log_config).map_err(|e| BridgeError::config(e.to_string()))?;

        tracing::info!(bridge = %name, version = %version, "Starting bridge");

        let availability_topic = TopicBuilder::new(config.topic_prefix()).availability();
        let (client, event_loop) = connect(config.mqtt(), &availability_topic)?;

        let publisher = Publisher::new(client.clone());
        let status = StatusPublisher::new(publisher.clone(), availability_topic);

        Ok(Self {
            name,
            config,
            client,
            event_loop,
            publisher,
            status,
            subscriptions: Vec::new(),
            inbound_tx: None,
            tasks: Vec::new(),
        })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Get a clone of the publisher.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// The topic availability is announced on.
    pub fn availability_topic(&self) -> &str {
        self.status.topic()
    }

    /// Subscribe to topic filters and get the channel their messages arrive on.
    ///
    /// Subscriptions are issued each time the client (re)connects. May only
    /// be called once.
    pub fn subscribe<I, T>(&mut self, topics: I) -> Result<mpsc::Receiver<InboundMessage>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if self.inbound_tx.is_some() {
            return Err(BridgeError::config("Bridge runner is already subscribed"));
        }

        self.subscriptions.extend(topics.into_iter().map(Into::into));
        tracing::info!(topics = ?self.subscriptions, "Registered MQTT subscriptions");

        let (tx, rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
        self.inbound_tx = Some(tx);
        Ok(rx)
    }

    /// Spawn a worker task.
    ///
    /// The task will be tracked and aborted on shutdown.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.tasks.push(handle);
    }

    /// Run the bridge until Ctrl+C is received.
    ///
    /// This will:
    /// 1. Drive the MQTT event loop, subscribing and announcing `online` on each connect
    /// 2. Wait for Ctrl+C signal
    /// 3. Abort all spawned tasks
    /// 4. Publish `offline` and disconnect
    pub async fn run(self) -> Result<()> {
        let Self {
            name,
            config,
            client,
            mut event_loop,
            status,
            subscriptions,
            inbound_tx,
            tasks,
            ..
        } = self;

        let connection = ConnectionHandler {
            client: client.clone(),
            status: status.clone(),
            subscriptions: subscriptions.into(),
            inbound_tx,
        };
        let reconnect_delay = config.mqtt().reconnect_delay();

        tracing::info!(
            bridge = %name,
            tasks = tasks.len(),
            "Bridge running. Press Ctrl+C to stop."
        );

        tokio::select! {
            _ = drive_event_loop(&mut event_loop, &connection, reconnect_delay) => {}
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        }

        tracing::info!(bridge = %name, "Received shutdown signal");

        for task in &tasks {
            task.abort();
        }

        if let Err(e) = status.publish_offline().await {
            tracing::warn!(error = %e, "Failed to publish offline status");
        }
        if let Err(e) = client.disconnect().await {
            tracing::warn!(error = %e, "Error requesting MQTT disconnect");
        }

        if tokio::time::timeout(SHUTDOWN_DRAIN_TIMEOUT, drain_event_loop(&mut event_loop))
            .await
            .is_err()
        {
            tracing::warn!("Timed out waiting for MQTT disconnect");
        }

        tracing::info!(bridge = %name, "Goodbye!");

        Ok(())
    }
}

/// State needed to react to connection events.
#[derive(Clone)]
struct ConnectionHandler {
    client: AsyncClient,
    status: StatusPublisher<Publisher>,
    subscriptions: Arc<[String]>,
    inbound_tx: Option<mpsc::Sender<InboundMessage>>,
}

impl ConnectionHandler {
    /// Subscribe to every registered filter and announce `online`.
    async fn on_connected(&self) -> Result<()> {
        for topic in self.subscriptions.iter() {
            self.client
                .subscribe(topic.as_str(), QoS::AtLeastOnce)
                .await
                .map_err(|e| BridgeError::Subscribe {
                    topic: topic.clone(),
                    message: e.to_string(),
                })?;
        }
        self.status.publish_online().await
    }

    /// Hand a message to the bridge worker without waiting.
    ///
    /// The worker publishes through the client channel this loop drains, so
    /// a full inbound channel drops the message instead of stalling the loop.
    /// Returns `true` if the message was queued.
    fn on_message(&self, message: InboundMessage) -> bool {
        let Some(tx) = &self.inbound_tx else {
            tracing::debug!(topic = %message.topic, "No inbound receiver, discarding message");
            return false;
        };

        match tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                tracing::warn!(topic = %message.topic, "Inbound channel full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Inbound receiver dropped, discarding message");
                false
            }
        }
    }
}

/// Poll the event loop forever, retrying after connection errors.
async fn drive_event_loop(
    event_loop: &mut EventLoop,
    connection: &ConnectionHandler,
    reconnect_delay: Duration,
) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::info!(code = ?ack.code, "Connected to MQTT broker");
                // Requests go through the client's bounded channel, which this
                // loop drains, so they must not be awaited here.
                let connection = connection.clone();
                tokio::spawn(async move {
                    if let Err(e) = connection.on_connected().await {
                        tracing::error!(error = %e, "Failed to initialize MQTT session");
                    }
                });
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(topic = %publish.topic, bytes = publish.payload.len(), "Received message");
                connection.on_message(publish.into());
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                tracing::debug!(pkid = ack.pkid, codes = ?ack.return_codes, "Subscription acknowledged");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    retry_ms = reconnect_delay.as_millis() as u64,
                    "MQTT connection error"
                );
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

/// Poll until the disconnect request has been written or the connection fails.
async fn drain_event_loop(event_loop: &mut EventLoop) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Event loop closed during shutdown");
                break;
            }
        }
    }
}

use crate::error::{Error, Result};

/// Default discovery prefix used by Home Assistant.
pub const DISCOVERY_PREFIX: &str = "homeassistant";

/// Availability payload announced while the bridge is connected.
pub const AVAILABILITY_ONLINE: &str = "online";

/// Availability payload left behind when the bridge disconnects.
pub const AVAILABILITY_OFFLINE: &str = "offline";

/// Builder for the topics a bridge publishes under.
///
/// Topics follow the pattern `<prefix>/<metric>`, with availability at
/// `<prefix>/status`.
#[derive(Debug, Clone)]
pub struct TopicBuilder {
    prefix: String,
}

impl TopicBuilder {
    /// Create a builder rooted at `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The topic prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build a state topic for a metric.
    ///
    /// # Example
    /// ```
    /// use generator_common::topics::TopicBuilder;
    ///
    /// let builder = TopicBuilder::new("generator2mqtt");
    /// assert_eq!(builder.build("voltage"), "generator2mqtt/voltage");
    /// ```
    pub fn build(&self, metric: &str) -> String {
        if metric.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{}", self.prefix, metric)
        }
    }

    /// Build the availability topic.
    ///
    /// # Example
    /// ```
    /// use generator_common::topics::TopicBuilder;
    ///
    /// let builder = TopicBuilder::new("generator2mqtt");
    /// assert_eq!(builder.availability(), "generator2mqtt/status");
    /// ```
    pub fn availability(&self) -> String {
        self.build("status")
    }
}

/// Build a Home Assistant discovery config topic.
///
/// # Example
/// ```
/// use generator_common::topics::{DISCOVERY_PREFIX, discovery_topic};
///
/// assert_eq!(
///     discovery_topic(DISCOVERY_PREFIX, "sensor", "generator_state"),
///     "homeassistant/sensor/generator_state/config"
/// );
/// ```
pub fn discovery_topic(discovery_prefix: &str, component: &str, object_id: &str) -> String {
    format!("{}/{}/{}/config", discovery_prefix, component, object_id)
}

/// Check that a topic is usable as a publish topic.
///
/// Publish topics must be non-empty and must not contain the `+` or `#`
/// wildcards or a NUL character.
pub fn validate_publish_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(Error::Topic("topic must not be empty".to_string()));
    }
    if topic.contains(['+', '#', '\0']) {
        return Err(Error::Topic(format!(
            "'{}' contains a wildcard or NUL character",
            topic
        )));
    }
    Ok(())
}

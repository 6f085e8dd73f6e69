use rumqttc::{AsyncClient, EventLoop, LastWill, MqttOptions, QoS};

use crate::config::MqttConfig;
use crate::error::Result;
use crate::topics::AVAILABILITY_OFFLINE;

/// Build client options for `config`.
///
/// The broker is told to publish a retained `offline` to `availability_topic`
/// if the connection drops without a clean disconnect.
pub fn mqtt_options(config: &MqttConfig, availability_topic: &str) -> Result<MqttOptions> {
    config.validate()?;

    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(config.keep_alive());
    options.set_last_will(LastWill::new(
        availability_topic,
        AVAILABILITY_OFFLINE,
        QoS::AtLeastOnce,
        true,
    ));

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        options.set_credentials(username, password);
    }

    Ok(options)
}

/// Create an MQTT client and its event loop.
///
/// No network traffic happens until the event loop is polled.
pub fn connect(config: &MqttConfig, availability_topic: &str) -> Result<(AsyncClient, EventLoop)> {
    let options = mqtt_options(config, availability_topic)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        client_id = %config.client_id,
        "Connecting to MQTT broker"
    );

    Ok(AsyncClient::new(options, config.channel_capacity))
}

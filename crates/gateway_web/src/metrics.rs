use crate::error::ApiError;
use crate::state::AppState;
use common::types::kafka::{RawConnectorConfig, CONNECTOR_CLASS_KEY};
use components::ConnectorRegistry;
use serde_json::Value;
use shared_clients::jolokia::JolokiaClient;
use shared_clients::kafka::{KafkaConnectClient, KafkaConnectClientError};
use tracing::debug;

pub const DISPLAY_NAME_KEY: &str = "connector.displayName";
pub const CONNECTOR_ID_KEY: &str = "connector.id";
const TOPIC_PREFIX_KEY: &str = "topic.prefix";

/// Adds the registry's display name and type id for the config's
/// `connector.class`, when that class is registered.
pub fn enrich_config(registry: &ConnectorRegistry, config: &mut RawConnectorConfig) {
    let descriptor = config
        .get(CONNECTOR_CLASS_KEY)
        .and_then(Value::as_str)
        .and_then(|class| registry.find_by_class(class));
    if let Some(descriptor) = descriptor {
        let display_name = Value::String(descriptor.display_name.clone());
        let id = Value::String(descriptor.id.clone());
        config.insert(DISPLAY_NAME_KEY.to_string(), display_name);
        config.insert(CONNECTOR_ID_KEY.to_string(), id);
    }
}

/// A connector's config as stored by Kafka Connect plus the registry fields.
pub async fn connector_config(
    registry: &ConnectorRegistry,
    client: &KafkaConnectClient,
    name: &str,
) -> Result<RawConnectorConfig, ApiError> {
    let mut config = client.get_connector_config(name).await?;
    if !config.contains_key(CONNECTOR_CLASS_KEY) {
        return Err(KafkaConnectClientError::failed_to_connect(
            client.endpoint(),
            "Failed to locate connector.class in response",
        )
        .into());
    }
    enrich_config(registry, &mut config);
    Ok(config)
}

fn required_str<'a>(config: &'a RawConnectorConfig, key: &str, name: &str) -> Result<&'a str, ApiError> {
    config
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::internal(format!("Connector \"{name}\" has no \"{key}\" in its configuration")))
}

/// Reads the streaming metrics of a Debezium connector from the Jolokia
/// agent running next to the cluster's workers.
pub async fn connector_metrics(
    state: &AppState,
    client: &KafkaConnectClient,
    name: &str,
) -> Result<Vec<Value>, ApiError> {
    let config = connector_config(&state.registry, client, name).await?;
    let server_name = required_str(&config, TOPIC_PREFIX_KEY, name)?;
    let connector_id = required_str(&config, CONNECTOR_ID_KEY, name)?;

    let url = JolokiaClient::jolokia_url(client.base_url(), state.metrics.jolokia_port)?;
    debug!("reading metrics of {} ({}) from {}", name, connector_id, url);
    Ok(state
        .jolokia
        .read_metrics(&url, connector_id, server_name, &state.metrics.attributes)
        .await?)
}

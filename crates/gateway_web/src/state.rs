use crate::error::ApiError;
use common::config::components::metrics::MetricsConfig;
use common::config::GatewayConfig;
use common::error::GatewayError;
use components::connectors::builtin;
use components::{ConnectorRegistry, ValidationPipeline};
use shared_clients::cluster::ClusterResolver;
use shared_clients::jolokia::JolokiaClient;
use shared_clients::kafka::{ClientTimeouts, HttpClient, KafkaConnectClient};
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<ConnectorRegistry>,
    pub pipeline: ValidationPipeline,
    pub resolver: Arc<ClusterResolver>,
    /// Shared by every Kafka Connect client, configured with the cluster timeouts.
    pub http: HttpClient,
    pub status_fan_out: usize,
    pub jolokia: JolokiaClient,
    pub metrics: MetricsConfig,
}

impl AppState {
    /// Builds the state around the built-in connector types.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let probe_timeout = config.validation.probe_timeout();
        let registry = ConnectorRegistry::new(builtin(probe_timeout)).map_err(GatewayError::init)?;
        Self::with_registry(config, Arc::new(registry))
    }

    pub fn with_registry(
        config: &GatewayConfig,
        registry: Arc<ConnectorRegistry>,
    ) -> Result<Self, GatewayError> {
        let jolokia = JolokiaClient::new(Duration::from_millis(config.metrics.timeout_ms))
            .map_err(GatewayError::init)?;
        let http = ClientTimeouts::from(&config.kafka_connect)
            .http_client()
            .map_err(GatewayError::init)?;

        Ok(Self {
            pipeline: ValidationPipeline::new(
                Arc::clone(&registry),
                config.validation.probe_timeout(),
            ),
            registry,
            resolver: Arc::new(ClusterResolver::new(config.kafka_connect_uris())),
            http,
            status_fan_out: config.kafka_connect.status_fan_out,
            jolokia,
            metrics: config.metrics.clone(),
        })
    }

    /// Client for the cluster behind a 1-based ordinal path segment.
    pub fn client(&self, cluster: &str) -> Result<KafkaConnectClient, ApiError> {
        let endpoint = self.resolver.resolve(cluster)?;
        Ok(KafkaConnectClient::new(endpoint.url(), self.http.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::components::kafka_connect::KafkaConnectUris;
    use serde_json::json;
    use shared_clients::kafka::KafkaConnectClientError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn cluster_clients_share_the_configured_timeouts() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connectors"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&slow)
            .await;
        let fast = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connectors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["orders"])))
            .mount(&fast)
            .await;

        let mut config = GatewayConfig::default();
        config.kafka_connect.uri = KafkaConnectUris::List(vec![slow.uri(), fast.uri()]);
        config.kafka_connect.request_timeout_ms = 100;
        let state = AppState::from_config(&config).unwrap();

        let err = state.client("1").unwrap().list_connectors().await.unwrap_err();
        assert!(matches!(err, KafkaConnectClientError::FailedToConnect { .. }));

        let names = state.client("2").unwrap().list_connectors().await.unwrap();
        assert_eq!(names, vec!["orders"]);
        assert_eq!(state.client("2").unwrap().endpoint(), fast.uri());
    }
}

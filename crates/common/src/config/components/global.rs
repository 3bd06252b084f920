use crate::config::components::kafka_connect::KafkaConnectConfig;
use crate::config::components::metrics::MetricsConfig;
use crate::config::components::server::ServerConfig;
use crate::config::components::validation::ValidationConfig;
use serde::Deserialize;

// ---------------- global config ----------------
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub kafka_connect: KafkaConnectConfig,
    pub metrics: MetricsConfig,
    pub validation: ValidationConfig,
}

impl GatewayConfig {
    pub fn new(
        server: ServerConfig,
        kafka_connect: KafkaConnectConfig,
        metrics: MetricsConfig,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            server,
            kafka_connect,
            metrics,
            validation,
        }
    }

    /// Raw Kafka Connect base URIs as configured, in order.
    pub fn kafka_connect_uris(&self) -> Vec<String> {
        self.kafka_connect.uri.entries()
    }
}

use core::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Formatter;

/// Config key carrying the connector implementation class.
pub const CONNECTOR_CLASS_KEY: &str = "connector.class";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KafkaConnectorType {
    Sink,
    Source,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for KafkaConnectorType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            KafkaConnectorType::Sink => write!(f, "sink"),
            KafkaConnectorType::Source => write!(f, "source"),
            KafkaConnectorType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Body of `POST /connectors`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KafkaConnectorDeployConfig {
    pub name: String,
    pub config: HashMap<String, String>,
}

impl KafkaConnectorDeployConfig {
    pub fn new(name: impl Into<String>, config: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectorTaskId {
    pub connector: String,
    pub task: u32,
}

/// Response of `GET /connectors/{name}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KafkaConnectorInfo {
    pub name: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<ConnectorTaskId>,
    #[serde(rename = "type", default)]
    pub conn_type: Option<KafkaConnectorType>,
}

impl KafkaConnectorInfo {
    pub fn connector_class(&self) -> Option<&str> {
        self.config.get(CONNECTOR_CLASS_KEY).map(String::as_str)
    }
}

/// Raw connector config as returned by `GET /connectors/{name}/config`.
pub type RawConnectorConfig = Map<String, Value>;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single Message Transforms the gateway offers for new connectors.
pub const ENABLED_TRANSFORMS: &[&str] = &[
    "io.debezium.transforms.ByLogicalTableRouter",
    "io.debezium.transforms.ExtractNewRecordState",
    "io.debezium.transforms.ContentBasedRouter",
    "io.debezium.transforms.Filter",
    "org.apache.kafka.connect.transforms.ValueToKey",
    "org.apache.kafka.connect.transforms.TimestampRouter",
];

/// Entry of the Debezium `GET /debezium/transforms` extension endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformInfo {
    #[serde(rename = "transform")]
    pub class_name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl TransformInfo {
    pub fn is_enabled(&self) -> bool {
        ENABLED_TRANSFORMS.contains(&self.class_name.as_str())
    }
}

use serde::Deserialize;

pub const DEFAULT_JOLOKIA_PORT: u16 = 8778;

/// Streaming metrics read for every connector when no attribute list is configured.
pub const DEFAULT_METRIC_ATTRIBUTES: &[&str] = &[
    "Connected",
    "MilliSecondsSinceLastEvent",
    "TotalNumberOfEventsSeen",
    "NumberOfEventsFiltered",
    "LastEvent",
    "QueueTotalCapacity",
    "QueueRemainingCapacity",
];

// ---------------- Metrics (Jolokia) Config ----------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    pub jolokia_port: u16,
    pub timeout_ms: u64,
    pub attributes: Vec<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            jolokia_port: DEFAULT_JOLOKIA_PORT,
            timeout_ms: 3_000,
            attributes: DEFAULT_METRIC_ATTRIBUTES
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_KAFKA_CONNECT_URI: &str = "http://localhost:8083";
/// Name of the configuration key holding the Kafka Connect base URIs.
pub const KAFKA_CONNECT_URI_KEY: &str = "kafka.connect.uri";

/// Kafka Connect base URIs, either as one comma separated string or as a
/// YAML list. Entries are kept as raw strings; parsing them is the job of
/// the cluster resolver so that a bad entry fails the request, not the boot.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum KafkaConnectUris {
    Joined(String),
    List(Vec<String>),
}

impl KafkaConnectUris {
    /// Trimmed, non-empty entries in configured order.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Joined(joined) => joined.split(',').collect(),
            Self::List(list) => list.iter().flat_map(|s| s.split(',')).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for KafkaConnectUris {
    fn default() -> Self {
        Self::Joined(DEFAULT_KAFKA_CONNECT_URI.to_string())
    }
}

// ---------------- Kafka Connect Config ----------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct KafkaConnectConfig {
    pub uri: KafkaConnectUris,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Upper bound of concurrent per-connector lookups when listing status.
    pub status_fan_out: usize,
}

impl KafkaConnectConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for KafkaConnectConfig {
    fn default() -> Self {
        Self {
            uri: KafkaConnectUris::default(),
            connect_timeout_ms: 3_000,
            request_timeout_ms: 10_000,
            status_fan_out: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_uris_are_split_and_trimmed() {
        let uris = KafkaConnectUris::Joined("http://localhost:1234, http://localhorst:4567".into());
        assert_eq!(
            uris.entries(),
            vec!["http://localhost:1234", "http://localhorst:4567"]
        );
    }

    #[test]
    fn blank_entries_are_dropped() {
        let uris = KafkaConnectUris::List(vec![" ".into(), "http://a:1,".into()]);
        assert_eq!(uris.entries(), vec!["http://a:1"]);
        assert!(KafkaConnectUris::Joined(" , ".into()).entries().is_empty());
    }
}

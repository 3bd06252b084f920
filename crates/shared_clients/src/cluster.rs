use common::config::components::kafka_connect::KAFKA_CONNECT_URI_KEY;
use common::error::diagnostics::DiagnosticMessage;
use once_cell::sync::OnceCell;
use reqwest::Url;
use serde::{Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("invalid cluster: {context}")]
    InvalidCluster {
        ordinal: String,
        context: DiagnosticMessage,
    },
    #[error("cluster configuration error: {context}")]
    Configuration {
        context: DiagnosticMessage,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ClusterError {
    #[track_caller]
    pub fn invalid_cluster(ordinal: &str, endpoints: &ClusterEndpointList) -> Self {
        let message = if endpoints.is_empty() {
            format!(
                "Kafka Connect cluster list is empty! Did you forget to set a value for configuration property \"{KAFKA_CONNECT_URI_KEY}\"?"
            )
        } else {
            format!(
                "Selected cluster ({ordinal}) is not available in the list of configured clusters {endpoints}."
            )
        };
        Self::InvalidCluster {
            ordinal: ordinal.to_string(),
            context: DiagnosticMessage::new(message),
        }
    }

    #[track_caller]
    pub fn configuration<E>(entry: &str, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Configuration {
            context: DiagnosticMessage::new(format!(
                "Error parsing Kafka Connect cluster URI \"{entry}\": {err}"
            )),
            source: Some(Box::new(err)),
        }
    }

    #[track_caller]
    pub fn configuration_msg(entry: &str, reason: &str) -> Self {
        Self::Configuration {
            context: DiagnosticMessage::new(format!(
                "Error parsing Kafka Connect cluster URI \"{entry}\": {reason}"
            )),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidCluster { context, .. } | Self::Configuration { context, .. } => {
                context.message()
            }
        }
    }
}

/// One configured Kafka Connect base URI.
///
/// Serialises as the configured string, which can differ from the parsed
/// form (`Url` normalises `http://host:1234` to `http://host:1234/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
    raw: String,
    url: Url,
}

impl ClusterEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ClusterError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| ClusterError::configuration(raw, e))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ClusterError::configuration_msg(raw, "URI has no host"));
        }
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for ClusterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ClusterEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Ordered Kafka Connect clusters; ordinal `n` addresses entry `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ClusterEndpointList(Vec<ClusterEndpoint>);

impl ClusterEndpointList {
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, ClusterError> {
        raw.iter()
            .map(|s| ClusterEndpoint::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterEndpoint> {
        self.0.iter()
    }

    /// 1-based lookup.
    pub fn get(&self, ordinal: usize) -> Option<&ClusterEndpoint> {
        ordinal.checked_sub(1).and_then(|idx| self.0.get(idx))
    }
}

impl fmt::Display for ClusterEndpointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(ClusterEndpoint::as_str).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

/// Maps cluster ordinals taken from request paths onto configured endpoints.
///
/// The endpoint list is parsed on first use and kept for the life of the
/// resolver. A failed parse is reported to that request and retried on the
/// next one.
#[derive(Debug)]
pub struct ClusterResolver {
    raw: Vec<String>,
    endpoints: OnceCell<ClusterEndpointList>,
}

impl ClusterResolver {
    pub fn new(raw: Vec<String>) -> Self {
        Self {
            raw,
            endpoints: OnceCell::new(),
        }
    }

    pub fn endpoints(&self) -> Result<&ClusterEndpointList, ClusterError> {
        self.endpoints.get_or_try_init(|| {
            debug!("parsing {} Kafka Connect cluster URI(s)", self.raw.len());
            ClusterEndpointList::parse(&self.raw).inspect_err(|e| error!("{}", e))
        })
    }

    /// Resolves a 1-based ordinal, given either as the raw path segment or
    /// as a number.
    pub fn resolve<O: ToString>(&self, ordinal: O) -> Result<&ClusterEndpoint, ClusterError> {
        let endpoints = self.endpoints()?;
        let ordinal = ordinal.to_string();
        ordinal
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .and_then(|n| endpoints.get(n))
            .ok_or_else(|| ClusterError::invalid_cluster(&ordinal, endpoints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(raw: &[&str]) -> ClusterResolver {
        ClusterResolver::new(raw.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn lists_endpoints_as_configured() {
        let r = resolver(&["http://localhost:1234", "http://localhorst:4567"]);
        let json = serde_json::to_value(r.endpoints().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["http://localhost:1234", "http://localhorst:4567"])
        );
    }

    #[test]
    fn resolves_one_based_ordinals() {
        let r = resolver(&["http://a:8083", "http://b:8083"]);
        assert_eq!(r.resolve("1").unwrap().as_str(), "http://a:8083");
        assert_eq!(r.resolve(2).unwrap().as_str(), "http://b:8083");
        assert_eq!(r.resolve(2).unwrap().url().host_str(), Some("b"));
    }

    #[test]
    fn out_of_range_ordinals_are_invalid() {
        let r = resolver(&["http://a:8083", "http://b:8083"]);
        for bad in ["0", "3", "-1", "abc", ""] {
            let err = r.resolve(bad).unwrap_err();
            match &err {
                ClusterError::InvalidCluster { ordinal, context } => {
                    assert_eq!(ordinal, bad);
                    assert!(context.message().contains("[http://a:8083, http://b:8083]"));
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn empty_list_is_invalid_cluster() {
        let r = resolver(&[]);
        assert!(r.endpoints().unwrap().is_empty());
        let err = r.resolve(1).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidCluster { .. }));
        assert!(err.message().contains(KAFKA_CONNECT_URI_KEY));
    }

    #[test]
    fn malformed_entry_is_configuration_error() {
        let r = resolver(&["http://a:8083", "not a uri"]);
        let err = r.resolve(1).unwrap_err();
        assert!(matches!(err, ClusterError::Configuration { .. }));
        assert!(err.message().contains("\"not a uri\""));
        assert!(r.endpoints.get().is_none());
    }

    #[test]
    fn list_is_parsed_once() {
        let r = resolver(&["http://a:8083"]);
        let first = r.endpoints().unwrap() as *const _;
        let second = r.endpoints().unwrap() as *const _;
        assert_eq!(first, second);
    }
}

use common::error::diagnostics::DiagnosticMessage;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum JolokiaError {
    #[error("metrics unavailable: {context}")]
    Unreachable {
        url: String,
        context: DiagnosticMessage,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("invalid metrics endpoint: {context}")]
    InvalidUrl { context: DiagnosticMessage },
}

impl JolokiaError {
    #[track_caller]
    fn unreachable(url: &Url, err: reqwest::Error) -> Self {
        error!("Jolokia request to {} failed: {}", url, err);
        Self::Unreachable {
            url: url.to_string(),
            context: DiagnosticMessage::new(format!(
                "Could not read connector metrics! Jolokia is not available at \"{url}\": {err}"
            )),
            source: Some(err),
        }
    }

    #[track_caller]
    fn invalid_url(base: &Url) -> Self {
        Self::InvalidUrl {
            context: DiagnosticMessage::new(format!(
                "cannot derive a Jolokia URL from \"{base}\""
            )),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unreachable { context, .. } | Self::InvalidUrl { context } => context.message(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReadRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mbean: &'a str,
    attribute: &'a str,
}

/// Streaming metrics MBean Debezium registers for a connector.
pub fn streaming_mbean(connector_id: &str, server_name: &str) -> String {
    format!("debezium.{connector_id}:type=connector-metrics,context=streaming,server={server_name}")
}

/// Minimal Jolokia agent client speaking the JSON `read` protocol.
#[derive(Debug, Clone)]
pub struct JolokiaClient {
    http: Client,
}

impl JolokiaClient {
    pub fn new(timeout: Duration) -> Result<Self, JolokiaError> {
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| JolokiaError::Unreachable {
                url: String::new(),
                context: DiagnosticMessage::new(e.to_string()),
                source: Some(e),
            })?;
        Ok(Self { http })
    }

    /// Jolokia agent URL of the worker behind a Kafka Connect base URI: same
    /// scheme and host, the agent port, and `jolokia` appended to the path.
    pub fn jolokia_url(cluster: &Url, port: u16) -> Result<Url, JolokiaError> {
        let mut url = cluster.clone();
        url.set_port(Some(port))
            .map_err(|_| JolokiaError::invalid_url(cluster))?;
        let path = format!("{}/jolokia", cluster.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Reads each attribute of the connector's streaming MBean, one request
    /// per attribute, returning the agent's raw response objects in order.
    pub async fn read_metrics(
        &self,
        url: &Url,
        connector_id: &str,
        server_name: &str,
        attributes: &[String],
    ) -> Result<Vec<Value>, JolokiaError> {
        let mbean = streaming_mbean(connector_id, server_name);
        let mut responses = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let req = ReadRequest {
                kind: "read",
                mbean: &mbean,
                attribute,
            };
            let resp = self
                .http
                .post(url.clone())
                .json(&req)
                .send()
                .await
                .map_err(|e| JolokiaError::unreachable(url, e))?;
            let body: Value = resp
                .json()
                .await
                .map_err(|e| JolokiaError::unreachable(url, e))?;
            debug!("jolokia {} {} -> {}", mbean, attribute, body);
            responses.push(body);
        }
        Ok(responses)
    }
}

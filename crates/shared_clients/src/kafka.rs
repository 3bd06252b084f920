use common::config::components::kafka_connect::KafkaConnectConfig;
use common::error::diagnostics::DiagnosticMessage;
use common::types::kafka::{
    KafkaConnectorDeployConfig, KafkaConnectorInfo, KafkaConnectorStatus, RawConnectorConfig,
    TransformInfo,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

pub use reqwest::Client as HttpClient;

#[derive(Debug, Error)]
pub enum KafkaConnectClientError {
    #[error("connectivity error: {context}")]
    FailedToConnect {
        endpoint: String,
        context: DiagnosticMessage,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("Kafka Connect responded with status {status}: {body}")]
    Remote {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
}

impl KafkaConnectClientError {
    #[track_caller]
    pub fn failed_to_connect(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        Self::FailedToConnect {
            endpoint: endpoint.to_string(),
            context: DiagnosticMessage::new(unreachable_message(endpoint, reason)),
            source: None,
        }
    }

    #[track_caller]
    fn transport(endpoint: &str, err: reqwest::Error) -> Self {
        error!("Kafka Connect request to {} failed: {}", endpoint, err);
        Self::FailedToConnect {
            endpoint: endpoint.to_string(),
            context: DiagnosticMessage::new(unreachable_message(endpoint, &err)),
            source: Some(err),
        }
    }

    pub fn remote(status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            content_type,
            body: body.into(),
        }
    }
}

fn unreachable_message(endpoint: &str, reason: impl std::fmt::Display) -> String {
    format!(
        "Could not connect to Kafka Connect! Kafka Connect REST API is not available at \"{endpoint}\": {reason}"
    )
}

/// Status, content type and body of a well-formed Kafka Connect response,
/// passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ConnectResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_error(self) -> KafkaConnectClientError {
        KafkaConnectClientError::remote(self.status, self.content_type, self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl From<&KafkaConnectConfig> for ClientTimeouts {
    fn from(cfg: &KafkaConnectConfig) -> Self {
        Self {
            connect: cfg.connect_timeout(),
            request: cfg.request_timeout(),
        }
    }
}

impl ClientTimeouts {
    /// HTTP client applying these timeouts. Build it once and share it
    /// between [`KafkaConnectClient`]s, it owns the connection pool.
    pub fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .connect_timeout(self.connect)
            .timeout(self.request)
            .build()
    }
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        (&KafkaConnectConfig::default()).into()
    }
}

/// REST client bound to one Kafka Connect cluster.
#[derive(Debug, Clone)]
pub struct KafkaConnectClient {
    base: Url,
    endpoint: String,
    http: Client,
}

impl KafkaConnectClient {
    /// Binds `http` (see [`ClientTimeouts::http_client`]) to one cluster.
    pub fn new(base: &Url, http: Client) -> Result<Self, KafkaConnectClientError> {
        let endpoint = base.as_str().trim_end_matches('/').to_string();
        if base.cannot_be_a_base() {
            return Err(KafkaConnectClientError::failed_to_connect(
                &endpoint,
                "not a valid base URI",
            ));
        }

        Ok(Self {
            base: base.clone(),
            endpoint,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, KafkaConnectClientError> {
        req.send()
            .await
            .map_err(|e| KafkaConnectClientError::transport(&self.endpoint, e))
    }

    async fn read_body(&self, resp: Response) -> Result<ConnectResponse, KafkaConnectClientError> {
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .text()
            .await
            .map_err(|e| KafkaConnectClientError::transport(&self.endpoint, e))?;
        debug!("Kafka Connect {} answered {}: {}", self.endpoint, status, body);
        Ok(ConnectResponse {
            status,
            content_type,
            body,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, KafkaConnectClientError> {
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            return Err(self.read_body(resp).await?.into_error());
        }
        resp.json::<T>()
            .await
            .map_err(|e| KafkaConnectClientError::transport(&self.endpoint, e))
    }

    async fn passthrough(&self, req: RequestBuilder) -> Result<ConnectResponse, KafkaConnectClientError> {
        let resp = self.send(req).await?;
        self.read_body(resp).await
    }

    /// Submits a new connector and returns Kafka Connect's response body.
    pub async fn create_connector(
        &self,
        cfg: &KafkaConnectorDeployConfig,
    ) -> Result<String, KafkaConnectClientError> {
        let req = self.request(Method::POST, &["connectors"]).json(cfg);
        let resp = self.passthrough(req).await?;
        if resp.is_success() {
            Ok(resp.body)
        } else {
            Err(resp.into_error())
        }
    }

    pub async fn list_connectors(&self) -> Result<Vec<String>, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["connectors"]))
            .await
    }

    pub async fn get_connector_info(
        &self,
        name: &str,
    ) -> Result<KafkaConnectorInfo, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["connectors", name]))
            .await
    }

    pub async fn get_connector_status(
        &self,
        name: &str,
    ) -> Result<KafkaConnectorStatus, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["connectors", name, "status"]))
            .await
    }

    pub async fn get_connector_config(
        &self,
        name: &str,
    ) -> Result<RawConnectorConfig, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["connectors", name, "config"]))
            .await
    }

    pub async fn delete_connector(&self, name: &str) -> Result<ConnectResponse, KafkaConnectClientError> {
        self.passthrough(self.request(Method::DELETE, &["connectors", name]))
            .await
    }

    pub async fn update_connector_config<C: Serialize + ?Sized>(
        &self,
        name: &str,
        config: &C,
    ) -> Result<ConnectResponse, KafkaConnectClientError> {
        let req = self
            .request(Method::PUT, &["connectors", name, "config"])
            .json(config);
        self.passthrough(req).await
    }

    pub async fn pause_connector(&self, name: &str) -> Result<ConnectResponse, KafkaConnectClientError> {
        self.passthrough(self.request(Method::PUT, &["connectors", name, "pause"]))
            .await
    }

    pub async fn resume_connector(&self, name: &str) -> Result<ConnectResponse, KafkaConnectClientError> {
        self.passthrough(self.request(Method::PUT, &["connectors", name, "resume"]))
            .await
    }

    pub async fn restart_connector(&self, name: &str) -> Result<ConnectResponse, KafkaConnectClientError> {
        self.passthrough(self.request(Method::POST, &["connectors", name, "restart"]))
            .await
    }

    pub async fn restart_task(
        &self,
        name: &str,
        task: u32,
    ) -> Result<ConnectResponse, KafkaConnectClientError> {
        let task = task.to_string();
        let req = self.request(
            Method::POST,
            &["connectors", name, "tasks", task.as_str(), "restart"],
        );
        self.passthrough(req).await
    }

    /// Transforms installed on the workers (Debezium REST extension).
    pub async fn list_transforms(&self) -> Result<Vec<TransformInfo>, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["debezium", "transforms"]))
            .await
    }

    pub async fn is_topic_creation_enabled(&self) -> Result<bool, KafkaConnectClientError> {
        self.fetch_json(self.request(Method::GET, &["debezium", "topic-creation-enabled"]))
            .await
    }
}

/// Builds the connector config map sent on create, with `connector.class`
/// set to the given implementation class.
pub fn with_connector_class(
    mut config: HashMap<String, String>,
    class_name: &str,
) -> HashMap<String, String> {
    config.insert(
        common::types::kafka::CONNECTOR_CLASS_KEY.to_string(),
        class_name.to_string(),
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::kafka::ConnectorState;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> KafkaConnectClient {
        let url = Url::parse(&server.uri()).unwrap();
        let http = ClientTimeouts::default().http_client().unwrap();
        KafkaConnectClient::new(&url, http).unwrap()
    }

    #[tokio::test]
    async fn create_posts_name_and_config() {
        let server = MockServer::start().await;
        let body = json!({
            "name": "inventory",
            "config": { "connector.class": "io.debezium.connector.postgresql.PostgresConnector" }
        });
        Mock::given(method("POST"))
            .and(path("/connectors"))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = KafkaConnectorDeployConfig::new(
            "inventory",
            with_connector_class(
                HashMap::new(),
                "io.debezium.connector.postgresql.PostgresConnector",
            ),
        );
        let created = client_for(&server).create_connector(&cfg).await.unwrap();
        let echoed: serde_json::Value = serde_json::from_str(&created).unwrap();
        assert_eq!(echoed, body);
    }

    #[tokio::test]
    async fn remote_errors_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connectors"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_string(r#"{"error_code":409,"message":"Connector inventory already exists"}"#),
            )
            .mount(&server)
            .await;

        let cfg = KafkaConnectorDeployConfig::new("inventory", HashMap::new());
        let err = client_for(&server).create_connector(&cfg).await.unwrap_err();
        match err {
            KafkaConnectClientError::Remote { status, body, .. } => {
                assert_eq!(status, 409);
                assert!(body.contains("already exists"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn reads_status_of_connector() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connectors/inventory/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "inventory",
                "connector": { "state": "PAUSED", "worker_id": "w1" },
                "tasks": [{ "id": 0, "state": "RUNNING", "worker_id": "w1" }],
                "type": "source"
            })))
            .mount(&server)
            .await;

        let status = client_for(&server)
            .get_connector_status("inventory")
            .await
            .unwrap();
        assert_eq!(status.connector.state, ConnectorState::Paused);
        assert_eq!(status.tasks.len(), 1);
    }

    #[tokio::test]
    async fn passthrough_returns_non_success_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/connectors/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .delete_connector("missing")
            .await
            .unwrap();
        assert_eq!(
            resp,
            ConnectResponse {
                status: 404,
                content_type: Some("text/plain".into()),
                body: "not found".into()
            }
        );
    }

    #[tokio::test]
    async fn restart_task_targets_task_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connectors/inventory/tasks/2/restart"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .restart_task("inventory", 2)
            .await
            .unwrap();
        assert!(resp.is_success());
    }

    #[tokio::test]
    async fn debezium_extension_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/debezium/transforms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "transform": "io.debezium.transforms.Filter", "properties": {} },
                { "transform": "com.acme.Custom" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/debezium/topic-creation-enabled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let transforms = client.list_transforms().await.unwrap();
        assert_eq!(transforms.len(), 2);
        assert!(transforms[0].is_enabled());
        assert!(!transforms[1].is_enabled());
        assert!(client.is_topic_creation_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn unreachable_cluster_names_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
        let http = ClientTimeouts::default().http_client().unwrap();
        let client = KafkaConnectClient::new(&url, http).unwrap();
        let err = client.list_connectors().await.unwrap_err();
        match err {
            KafkaConnectClientError::FailedToConnect {
                endpoint, context, ..
            } => {
                assert_eq!(endpoint, format!("http://127.0.0.1:{port}"));
                assert!(context.message().contains(&endpoint));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_cluster_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connectors"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let http = ClientTimeouts {
            connect: Duration::from_millis(100),
            request: Duration::from_millis(50),
        }
        .http_client()
        .unwrap();
        let client = KafkaConnectClient::new(&url, http).unwrap();
        let err = client.list_connectors().await.unwrap_err();
        assert!(matches!(err, KafkaConnectClientError::FailedToConnect { .. }));
    }
}

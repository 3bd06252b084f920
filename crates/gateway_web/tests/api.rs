use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::config::components::kafka_connect::KafkaConnectUris;
use common::config::GatewayConfig;
use gateway_web::{configure, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POSTGRES: &str = "io.debezium.connector.postgresql.PostgresConnector";
const MYSQL: &str = "io.debezium.connector.mysql.MySqlConnector";

fn state(uris: &str) -> web::Data<AppState> {
    let mut config = GatewayConfig::default();
    config.kafka_connect.uri = KafkaConnectUris::Joined(uris.to_string());
    config.kafka_connect.connect_timeout_ms = 500;
    config.kafka_connect.request_timeout_ms = 2_000;
    web::Data::new(AppState::from_config(&config).unwrap())
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[actix_web::test]
async fn lists_configured_clusters_in_order() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234, http://localhorst:4567"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/connect-clusters").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!(["http://localhost:1234", "http://localhorst:4567"]));
}

#[actix_web::test]
async fn unknown_connector_type_is_a_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/connector-types/oracle").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Unknown connector type: oracle"}));

    let req = test::TestRequest::post()
        .uri("/api/connector-types/oracle/validation/properties")
        .set_json(json!({"topic.prefix": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn describes_builtin_types() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/connector-types").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["postgres", "mongodb", "mysql", "sqlserver"]);
    assert_eq!(body[0]["className"], POSTGRES);
    assert_eq!(body[0]["enabled"], true);

    let req = test::TestRequest::get().uri("/api/connector-types/postgres").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let port = body["properties"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "database.port")
        .unwrap();
    assert_eq!(port["type"], "INT");
    assert_eq!(port["defaultValue"], 5432);
    assert_eq!(port["category"], "CONNECTION");
}

#[actix_web::test]
async fn property_validation_reports_first_error_per_key() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/connector-types/postgres/validation/properties")
        .set_json(json!({"database.port": "not-a-port", "topic.prefix": "fulfillment"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "INVALID");
    let results = body["propertyValidationResults"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["property"], "database.port");
}

#[actix_web::test]
async fn create_without_config_never_reaches_the_cluster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::post()
        .uri("/api/connector/1/postgres")
        .set_json(json!({"name": "c1", "config": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("\"config\""));
}

#[actix_web::test]
async fn create_with_blank_name_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/api/connector/1/postgres")
        .set_json(json!({"name": "  ", "config": {"topic.prefix": "x"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Connector \"name\" property is not set!");
}

#[actix_web::test]
async fn create_with_invalid_properties_returns_the_validation_result() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/api/connector/1/postgres")
        .set_json(json!({"name": "c1", "config": {"plugin.name": "wal2json"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "INVALID");
    assert_eq!(body["propertyValidationResults"][0]["property"], "plugin.name");
}

#[actix_web::test]
async fn create_injects_connector_class() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connectors"))
        .and(body_partial_json(json!({
            "name": "inventory",
            "config": {"connector.class": POSTGRES, "topic.prefix": "fulfillment"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "inventory"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::post()
        .uri("/api/connector/1/postgres")
        .set_json(json!({"name": "inventory", "config": {"topic.prefix": "fulfillment", "tasks.max": 1}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"name": "inventory"}));
}

#[actix_web::test]
async fn unreachable_cluster_is_service_unavailable() {
    let uri = format!("http://127.0.0.1:{}", closed_port());
    let app = test::init_service(App::new().app_data(state(&uri)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/connector/1/postgres")
        .set_json(json!({"name": "inventory", "config": {"topic.prefix": "fulfillment"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains(&uri));
    assert!(body.get("trace").is_some());
}

#[actix_web::test]
async fn out_of_range_cluster_names_the_configured_list() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://a:8083,http://b:8083"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/connectors/3").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Selected cluster (3) is not available in the list of configured clusters [http://a:8083, http://b:8083]."
    );
}

#[actix_web::test]
async fn listing_skips_unsupported_connectors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/connectors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["orders", "sink", "users"])))
        .mount(&server)
        .await;
    for (name, class) in [("orders", POSTGRES), ("sink", "com.acme.JdbcSink"), ("users", MYSQL)] {
        Mock::given(method("GET"))
            .and(path(format!("/connectors/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": name,
                "config": {"connector.class": class},
                "tasks": [{"connector": name, "task": 0}],
                "type": "source"
            })))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/connectors/orders/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "orders",
            "connector": {"state": "RUNNING", "worker_id": "w1:8083"},
            "tasks": [{"id": 0, "state": "FAILED", "worker_id": "w1:8083",
                       "trace": "org.apache.kafka.connect.errors.ConnectException: x\nCaused by: java.io.IOException: y"}],
            "type": "source"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/connectors/users/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "users",
            "connector": {"state": "PAUSED", "worker_id": "w2:8083"},
            "tasks": [],
            "type": "source"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/connectors/sink/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/connectors/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!([
            {
                "name": "orders",
                "connectorType": "postgres",
                "databaseName": "PostgreSQL",
                "connectorStatus": "RUNNING",
                "taskStates": {"0": {"taskStatus": "FAILED", "errors": ["Caused by: java.io.IOException: y"]}}
            },
            {
                "name": "users",
                "connectorType": "mysql",
                "databaseName": "MySQL",
                "connectorStatus": "PAUSED",
                "taskStates": {}
            }
        ])
    );
}

#[actix_web::test]
async fn listing_drops_failing_connectors_and_keeps_name_order() {
    let server = MockServer::start().await;
    let names = ["a", "b", "c", "d", "e"];
    Mock::given(method("GET"))
        .and(path("/connectors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(names)))
        .mount(&server)
        .await;
    for (idx, name) in names.iter().enumerate() {
        // earlier names answer last
        let delay = Duration::from_millis(40 * (names.len() - idx) as u64);
        let info = if *name == "b" {
            ResponseTemplate::new(500).set_body_json(json!({"error_code": 500, "message": "boom"}))
        } else {
            ResponseTemplate::new(200).set_body_json(json!({
                "name": name,
                "config": {"connector.class": POSTGRES},
                "tasks": [],
                "type": "source"
            }))
        };
        Mock::given(method("GET"))
            .and(path(format!("/connectors/{name}")))
            .respond_with(info.set_delay(delay))
            .mount(&server)
            .await;
        let status = if *name == "d" {
            ResponseTemplate::new(200).set_body_string("not json")
        } else {
            ResponseTemplate::new(200).set_body_json(json!({
                "name": name,
                "connector": {"state": "RUNNING", "worker_id": "w1:8083"},
                "tasks": [],
                "type": "source"
            }))
        };
        Mock::given(method("GET"))
            .and(path(format!("/connectors/{name}/status")))
            .respond_with(status.set_delay(delay))
            .mount(&server)
            .await;
    }

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/connectors/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let listed: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["a", "c", "e"]);
}

#[actix_web::test]
async fn passthrough_keeps_remote_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/connectors/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error_code": 404, "message": "Connector missing not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/connectors/orders/pause"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;

    let req = test::TestRequest::delete().uri("/api/connectors/1/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Connector missing not found");

    let req = test::TestRequest::put().uri("/api/connector/1/orders/pause").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn passthrough_keeps_remote_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connectors/orders/restart"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream proxy down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/connectors/orders/config"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;

    let req = test::TestRequest::post().uri("/api/connector/1/orders/restart").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/plain");
    assert_eq!(test::read_body(resp).await, "upstream proxy down");

    let req = test::TestRequest::get().uri("/api/connectors/1/orders/config").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/html");
}

#[actix_web::test]
async fn config_is_enriched_with_registry_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/connectors/orders/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connector.class": POSTGRES,
            "topic.prefix": "fulfillment"
        })))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/connectors/1/orders/config").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["connector.displayName"], "PostgreSQL");
    assert_eq!(body["connector.id"], "postgres");
    assert_eq!(body["topic.prefix"], "fulfillment");
}

#[actix_web::test]
async fn transforms_are_filtered_to_the_allow_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/debezium/transforms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"transform": "io.debezium.transforms.Filter", "properties": {}},
            {"transform": "org.apache.kafka.connect.transforms.InsertField$Value", "properties": {}}
        ])))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state(&server.uri())).configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/1/transforms").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let classes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["transform"].as_str().unwrap())
        .collect();
    assert_eq!(classes, vec!["io.debezium.transforms.Filter"]);
}

#[actix_web::test]
async fn health_check_is_ok() {
    let app = test::init_service(
        App::new()
            .app_data(state("http://localhost:1234"))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

use crate::error::ApiError;
use crate::metrics::{connector_config, connector_metrics};
use crate::state::AppState;
use crate::status::list_aggregated_status;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::types::kafka::{KafkaConnectorDeployConfig, TransformInfo};
use components::pipeline::coerce_properties;
use components::PipelineError;
use serde::Deserialize;
use serde_json::{Map, Value};
use shared_clients::kafka::{with_connector_class, ConnectResponse};
use std::sync::Arc;
use tracing::debug;

type ApiResult = Result<HttpResponse, ApiError>;
type Properties = web::Json<Map<String, Value>>;

/// Body of `POST /api/connector/{cluster}/{type}`.
#[derive(Debug, Deserialize)]
pub struct CreateConnectorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
}

fn passthrough(resp: ConnectResponse) -> HttpResponse {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
    forward(status, resp.content_type.as_deref(), resp.body)
}

/// Response carrying an upstream body with the upstream content type,
/// JSON when Kafka Connect sent none.
pub(crate) fn forward(status: StatusCode, content_type: Option<&str>, body: String) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    match content_type {
        Some(content_type) => builder.content_type(content_type),
        None => builder.content_type(ContentType::json()),
    };
    builder.body(body)
}

async fn list_clusters(state: web::Data<AppState>) -> ApiResult {
    let endpoints = state.resolver.endpoints()?;
    Ok(HttpResponse::Ok().json(endpoints))
}

async fn list_connector_types(state: web::Data<AppState>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.registry.list()))
}

async fn get_connector_type(state: web::Data<AppState>, id: web::Path<String>) -> ApiResult {
    let descriptor = state
        .registry
        .describe(&id)
        .map_err(PipelineError::from)?;
    Ok(HttpResponse::Ok().json(descriptor))
}

async fn validate_connection(
    state: web::Data<AppState>,
    id: web::Path<String>,
    props: Properties,
) -> ApiResult {
    let result = state.pipeline.validate_connection(&id, &props).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn validate_filters(
    state: web::Data<AppState>,
    id: web::Path<String>,
    props: Properties,
) -> ApiResult {
    let result = state.pipeline.validate_filters(&id, &props).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn validate_properties(
    state: web::Data<AppState>,
    id: web::Path<String>,
    props: Properties,
) -> ApiResult {
    let result = state.pipeline.validate_properties(&id, &props)?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<CreateConnectorRequest>,
) -> ApiResult {
    let (cluster, type_id) = path.into_inner();
    let CreateConnectorRequest { name, config } = body.into_inner();

    let config = match config {
        Some(config) if !config.is_empty() => config,
        _ => return Err(ApiError::bad_request("Connector \"config\" property is not set!")),
    };
    let name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::bad_request("Connector \"name\" property is not set!")),
    };

    let props = coerce_properties(&config);
    let validation = state.pipeline.validate_config(&type_id, &props)?;
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(validation));
    }
    let class_name = state
        .registry
        .describe(&type_id)
        .map_err(PipelineError::from)?
        .class_name
        .clone();

    let client = state.client(&cluster)?;
    let deploy = KafkaConnectorDeployConfig::new(name, with_connector_class(props, &class_name));
    debug!("sending valid connector config for {} to {}", deploy.name, client.endpoint());
    let result = client.create_connector(&deploy).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(result))
}

async fn list_connectors(state: web::Data<AppState>, cluster: web::Path<String>) -> ApiResult {
    let client = state.client(&cluster)?;
    let views =
        list_aggregated_status(&client, Arc::clone(&state.registry), state.status_fan_out).await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn delete_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    Ok(passthrough(client.delete_connector(&name).await?))
}

async fn update_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    config: Properties,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    let config = coerce_properties(&config);
    Ok(passthrough(
        client.update_connector_config(&name, &config).await?,
    ))
}

async fn get_connector_config(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    let config = connector_config(&state.registry, &client, &name).await?;
    Ok(HttpResponse::Ok().json(config))
}

async fn get_connector_metrics(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    let metrics = connector_metrics(&state, &client, &name).await?;
    Ok(HttpResponse::Ok().json(metrics))
}

async fn pause_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    Ok(passthrough(client.pause_connector(&name).await?))
}

async fn resume_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    Ok(passthrough(client.resume_connector(&name).await?))
}

async fn restart_connector(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (cluster, name) = path.into_inner();
    let client = state.client(&cluster)?;
    Ok(passthrough(client.restart_connector(&name).await?))
}

async fn restart_task(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult {
    let (cluster, name, task) = path.into_inner();
    let task = task
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid task number: {task}")))?;
    let client = state.client(&cluster)?;
    Ok(passthrough(client.restart_task(&name, task).await?))
}

async fn list_transforms(state: web::Data<AppState>, cluster: web::Path<String>) -> ApiResult {
    let client = state.client(&cluster)?;
    let transforms: Vec<TransformInfo> = client
        .list_transforms()
        .await?
        .into_iter()
        .filter(TransformInfo::is_enabled)
        .collect();
    Ok(HttpResponse::Ok().json(transforms))
}

async fn topic_creation_enabled(
    state: web::Data<AppState>,
    cluster: web::Path<String>,
) -> ApiResult {
    let client = state.client(&cluster)?;
    Ok(HttpResponse::Ok().json(client.is_topic_creation_enabled().await?))
}

async fn health_handler() -> HttpResponse {
    debug!("health check requested");
    HttpResponse::Ok().finish()
}

/// Registers the `/api` routes and `/healthz`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/connect-clusters", web::get().to(list_clusters))
            .route("/connector-types", web::get().to(list_connector_types))
            .route("/connector-types/{id}", web::get().to(get_connector_type))
            .route(
                "/connector-types/{id}/validation/connection",
                web::post().to(validate_connection),
            )
            .route(
                "/connector-types/{id}/validation/filters",
                web::post().to(validate_filters),
            )
            .route(
                "/connector-types/{id}/validation/properties",
                web::post().to(validate_properties),
            )
            .route("/connector/{cluster}/{type_id}", web::post().to(create_connector))
            .route("/connector/{cluster}/{name}/pause", web::put().to(pause_connector))
            .route("/connector/{cluster}/{name}/resume", web::put().to(resume_connector))
            .route(
                "/connector/{cluster}/{name}/restart",
                web::post().to(restart_connector),
            )
            .route(
                "/connector/{cluster}/{name}/task/{task}/restart",
                web::post().to(restart_task),
            )
            .route("/connectors/{cluster}", web::get().to(list_connectors))
            .service(
                web::resource("/connectors/{cluster}/{name}")
                    .route(web::delete().to(delete_connector))
                    .route(web::put().to(update_connector)),
            )
            .route(
                "/connectors/{cluster}/{name}/config",
                web::get().to(get_connector_config),
            )
            .route(
                "/connectors/{cluster}/{name}/metrics",
                web::get().to(get_connector_metrics),
            )
            .route("/{cluster}/transforms", web::get().to(list_transforms))
            .route(
                "/{cluster}/topic-creation-enabled",
                web::get().to(topic_creation_enabled),
            ),
    )
    .route("/healthz", web::get().to(health_handler));
}

use common::types::kafka::{ConnectorState, KafkaConnectorStatus, TaskStatus};
use components::connectors::{mongodb, mysql, postgres, sqlserver};
use components::ConnectorRegistry;
use serde::Serialize;
use shared_clients::kafka::{KafkaConnectClient, KafkaConnectClientError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub const CAUSED_BY_PREFIX: &str = "Caused by:";
const UNKNOWN_LABEL: &str = "unknown";

/// Connector class, short type id and database label.
const KNOWN_CLASSES: &[(&str, &str, &str)] = &[
    (postgres::CONNECTOR_CLASS_NAME, "postgres", "PostgreSQL"),
    (mongodb::CONNECTOR_CLASS_NAME, "mongodb", "MongoDB"),
    (mysql::CONNECTOR_CLASS_NAME, "mysql", "MySQL"),
    (sqlserver::CONNECTOR_CLASS_NAME, "sqlserver", "SQL Server"),
];

/// Short type id and database label for a connector class. Unknown classes
/// keep their class name and get the `unknown` label.
pub fn normalise_class(class_name: &str) -> (String, String) {
    KNOWN_CLASSES
        .iter()
        .find(|(class, _, _)| *class == class_name)
        .map(|(_, id, label)| (id.to_string(), label.to_string()))
        .unwrap_or_else(|| (class_name.to_string(), UNKNOWN_LABEL.to_string()))
}

/// Keeps the trace lines that start with `Caused by:`.
pub fn caused_by(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.starts_with(CAUSED_BY_PREFIX))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStateView {
    pub task_status: ConnectorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl From<&TaskStatus> for TaskStateView {
    fn from(task: &TaskStatus) -> Self {
        let errors = match task.state {
            ConnectorState::Failed => task.raw_errors().map(|lines| caused_by(&lines)),
            _ => None,
        };
        Self {
            task_status: task.state,
            errors,
        }
    }
}

/// Compact status of one connector as listed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStatusView {
    pub name: String,
    pub connector_type: String,
    pub database_name: String,
    pub connector_status: ConnectorState,
    pub task_states: BTreeMap<u32, TaskStateView>,
}

impl ConnectorStatusView {
    pub fn new(class_name: &str, status: &KafkaConnectorStatus) -> Self {
        let (connector_type, database_name) = normalise_class(class_name);
        Self {
            name: status.name.clone(),
            connector_type,
            database_name,
            connector_status: status.connector.state,
            task_states: status
                .tasks
                .iter()
                .map(|task| (task.id, TaskStateView::from(task)))
                .collect(),
        }
    }
}

/// `None` when the connector is not of a registered type.
async fn connector_view(
    client: &KafkaConnectClient,
    registry: &ConnectorRegistry,
    name: &str,
) -> Result<Option<ConnectorStatusView>, KafkaConnectClientError> {
    let info = client.get_connector_info(name).await?;
    let Some(class_name) = info
        .connector_class()
        .filter(|class| registry.is_supported_class(class))
    else {
        debug!("skipping connector {} of unsupported class {:?}", name, info.connector_class());
        return Ok(None);
    };

    let status = client.get_connector_status(name).await?;
    Ok(Some(ConnectorStatusView::new(class_name, &status)))
}

/// Lists the connectors of one cluster with their aggregated status.
///
/// Info and status are fetched with at most `fan_out` connectors in flight.
/// Connectors of unregistered types are left out, as are connectors whose
/// lookups fail; the rest keep the order of the cluster's name list.
pub async fn list_aggregated_status(
    client: &KafkaConnectClient,
    registry: Arc<ConnectorRegistry>,
    fan_out: usize,
) -> Result<Vec<ConnectorStatusView>, KafkaConnectClientError> {
    let names = client.list_connectors().await?;
    debug!("Kafka Connect at {} lists {} connector(s)", client.endpoint(), names.len());

    let permits = Arc::new(Semaphore::new(fan_out.max(1)));
    let mut join_set = JoinSet::new();
    for (idx, name) in names.into_iter().enumerate() {
        let client = client.clone();
        let registry = Arc::clone(&registry);
        let permits = Arc::clone(&permits);
        join_set.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let view = connector_view(&client, &registry, &name).await;
            (idx, name, view)
        });
    }

    let mut collected = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, _, Ok(Some(view)))) => collected.push((idx, view)),
            Ok((_, _, Ok(None))) => {}
            Ok((_, name, Err(e))) => {
                warn!("dropping connector {} from listing: {}", name, e);
            }
            Err(e) => warn!("connector status lookup aborted: {}", e),
        }
    }

    collected.sort_by_key(|(idx, _)| *idx);
    Ok(collected.into_iter().map(|(_, view)| view).collect())
}

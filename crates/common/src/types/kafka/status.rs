use crate::types::kafka::connector::KafkaConnectorType;
use serde::{Deserialize, Serialize};

/// Lifecycle state Kafka Connect reports for connectors and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorState {
    Unassigned,
    Running,
    Paused,
    Failed,
    Destroyed,
    Restarting,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorStateInfo {
    pub state: ConnectorState,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: u32,
    pub state: ConnectorState,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
}

impl TaskStatus {
    /// The task's raw error trace split into lines; `None` when Kafka Connect
    /// reported no trace at all.
    pub fn raw_errors(&self) -> Option<Vec<String>> {
        self.trace
            .as_ref()
            .map(|trace| trace.lines().map(str::to_string).collect())
    }
}

/// Response of `GET /connectors/{name}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KafkaConnectorStatus {
    pub name: String,
    pub connector: ConnectorStateInfo,
    #[serde(default)]
    pub tasks: Vec<TaskStatus>,
    #[serde(rename = "type", default)]
    pub conn_type: Option<KafkaConnectorType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_connect_status_payload() {
        let status: KafkaConnectorStatus = serde_json::from_value(json!({
            "name": "inventory",
            "connector": { "state": "RUNNING", "worker_id": "10.0.0.1:8083" },
            "tasks": [
                { "id": 0, "state": "FAILED", "worker_id": "10.0.0.1:8083",
                  "trace": "org.apache.kafka.connect.errors.ConnectException: boom\n\tat Foo.bar\nCaused by: java.io.IOException: gone" }
            ],
            "type": "source"
        }))
        .unwrap();

        assert_eq!(status.connector.state, ConnectorState::Running);
        assert_eq!(status.conn_type, Some(KafkaConnectorType::Source));
        let lines = status.tasks[0].raw_errors().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Caused by: java.io.IOException: gone");
    }

    #[test]
    fn task_without_trace_has_no_raw_errors() {
        let task: TaskStatus =
            serde_json::from_value(json!({ "id": 1, "state": "RUNNING", "worker_id": "w" })).unwrap();
        assert!(task.raw_errors().is_none());
    }
}

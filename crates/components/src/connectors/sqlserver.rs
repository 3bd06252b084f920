use super::common::{self, connection_details, filter_list, probe_error};
use super::DEBEZIUM_VERSION;
use crate::config_def::{ConfigDef, ConfigKey, NativeType, Validator};
use crate::errors::ProbeError;
use crate::filters::{TABLE_EXCLUDE_LIST, TABLE_INCLUDE_LIST};
use crate::property::{DefaultValue, PropertyCategory};
use crate::traits::{ConnectorCapability, ConnectorProperties};
use async_trait::async_trait;
use shared_clients::tcp::check_reachable;
use shared_clients::DataCollection;
use std::time::Duration;

pub const CONNECTOR_CLASS_NAME: &str = "io.debezium.connector.sqlserver.SqlServerConnector";
const DEFAULT_PORT: u16 = 1433;

fn definition() -> ConfigDef {
    ConfigDef::new()
        .define_all([
            common::topic_prefix(),
            common::tasks_max(),
            common::hostname(),
            common::port(DEFAULT_PORT as i64),
            common::user(),
            common::password(),
            ConfigKey::new("database.names", NativeType::List, PropertyCategory::Connection)
                .display("Databases")
                .doc("The names of the databases from which the connector should capture changes.")
                .required()
                .validator(Validator::NonEmpty),
            ConfigKey::new("database.instance", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Instance name")
                .doc("The SQL Server instance name."),
            ConfigKey::new("database.encrypt", NativeType::Boolean, PropertyCategory::ConnectionAdvanced)
                .display("Encrypt connection")
                .doc("Whether the driver encrypts the connection to the database.")
                .default_value(DefaultValue::Boolean(true)),
            filter_list(
                TABLE_INCLUDE_LIST,
                "Include Tables",
                "The tables for which changes are to be captured.",
            ),
            filter_list(
                TABLE_EXCLUDE_LIST,
                "Exclude Tables",
                "A comma-separated list of regular expressions that match the fully-qualified names of tables to be excluded from monitoring.",
            ),
            ConfigKey::new("snapshot.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Snapshot mode")
                .doc("The criteria for running a snapshot upon startup of the connector.")
                .default_value(DefaultValue::string("initial"))
                .allowed(&["initial", "initial_only", "no_data", "recovery", "when_needed"]),
            ConfigKey::new("snapshot.isolation.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Snapshot isolation mode")
                .doc("Controls which transaction isolation level is used and how long the connector locks the captured tables.")
                .default_value(DefaultValue::string("repeatable_read"))
                .allowed(&["read_uncommitted", "read_committed", "repeatable_read", "snapshot", "exclusive"]),
        ])
        .define_all(common::runtime_keys())
        .mutually_exclusive(TABLE_INCLUDE_LIST, TABLE_EXCLUDE_LIST)
}

/// Described for the UI; creating SQL Server connectors is not enabled yet.
pub struct SqlServerCapability {
    def: ConfigDef,
    probe_timeout: Duration,
}

impl SqlServerCapability {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            def: definition(),
            probe_timeout,
        }
    }
}

#[async_trait]
impl ConnectorCapability for SqlServerCapability {
    fn id(&self) -> &'static str {
        "sqlserver"
    }

    fn class_name(&self) -> &'static str {
        CONNECTOR_CLASS_NAME
    }

    fn display_name(&self) -> &'static str {
        "SQL Server"
    }

    fn version(&self) -> &'static str {
        DEBEZIUM_VERSION
    }

    fn enabled(&self) -> bool {
        false
    }

    fn describe(&self) -> &ConfigDef {
        &self.def
    }

    async fn validate_connection(&self, props: &ConnectorProperties) -> Result<(), ProbeError> {
        let details = connection_details(props, DEFAULT_PORT)?;
        check_reachable(&details, self.probe_timeout)
            .await
            .map_err(|e| probe_error(e, None))
    }

    async fn list_data_collections(
        &self,
        _props: &ConnectorProperties,
    ) -> Result<Vec<DataCollection>, ProbeError> {
        Err(ProbeError::unsupported(
            "Listing tables is not supported for SQL Server connectors",
        ))
    }
}

use super::common::{self, connection_details, filter_list, probe_error};
use super::DEBEZIUM_VERSION;
use crate::config_def::{ConfigDef, ConfigKey, NativeType};
use crate::errors::ProbeError;
use crate::filters::{TABLE_EXCLUDE_LIST, TABLE_INCLUDE_LIST};
use crate::property::{DefaultValue, PropertyCategory};
use crate::traits::{ConnectorCapability, ConnectorProperties};
use async_trait::async_trait;
use shared_clients::tcp::check_reachable;
use shared_clients::DataCollection;
use std::time::Duration;

pub const CONNECTOR_CLASS_NAME: &str = "io.debezium.connector.mysql.MySqlConnector";
const DEFAULT_PORT: u16 = 3306;

const DATABASE_INCLUDE_LIST: &str = "database.include.list";
const DATABASE_EXCLUDE_LIST: &str = "database.exclude.list";

fn definition() -> ConfigDef {
    ConfigDef::new()
        .define_all([
            common::topic_prefix(),
            common::tasks_max(),
            common::hostname(),
            common::port(DEFAULT_PORT as i64),
            common::user(),
            common::password(),
            ConfigKey::new("database.server.id", NativeType::Long, PropertyCategory::Connection)
                .display("Cluster ID")
                .doc("A numeric ID of this database client, which must be unique across all currently-running database processes in the cluster.")
                .required()
                .range(Some(1), None),
            ConfigKey::new("database.ssl.mode", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("SSL mode")
                .doc("Whether to use an encrypted connection to the database.")
                .default_value(DefaultValue::string("preferred"))
                .allowed(&["disabled", "preferred", "required", "verify_ca", "verify_identity"]),
            filter_list(
                DATABASE_INCLUDE_LIST,
                "Include Databases",
                "The databases for which changes are to be captured.",
            ),
            filter_list(
                DATABASE_EXCLUDE_LIST,
                "Exclude Databases",
                "A comma-separated list of regular expressions that match database names to be excluded from monitoring.",
            ),
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
                .allowed(&[
                    "always",
                    "initial",
                    "initial_only",
                    "schema_only",
                    "no_data",
                    "never",
                    "when_needed",
                    "schema_only_recovery",
                    "recovery",
                ]),
            ConfigKey::new("include.schema.changes", NativeType::Boolean, PropertyCategory::ConnectorAdvanced)
                .display("Include database schema changes")
                .doc("Whether the connector should publish changes in the database schema to a Kafka topic.")
                .default_value(DefaultValue::Boolean(true)),
        ])
        .define_all(common::runtime_keys())
        .mutually_exclusive(DATABASE_INCLUDE_LIST, DATABASE_EXCLUDE_LIST)
        .mutually_exclusive(TABLE_INCLUDE_LIST, TABLE_EXCLUDE_LIST)
}

/// Described for the UI; creating MySQL connectors is not enabled yet.
pub struct MySqlCapability {
    def: ConfigDef,
    probe_timeout: Duration,
}

impl MySqlCapability {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            def: definition(),
            probe_timeout,
        }
    }
}

#[async_trait]
impl ConnectorCapability for MySqlCapability {
    fn id(&self) -> &'static str {
        "mysql"
    }

    fn class_name(&self) -> &'static str {
        CONNECTOR_CLASS_NAME
    }

    fn display_name(&self) -> &'static str {
        "MySQL"
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
        Err(ProbeError::unsupported("Listing tables is not supported for MySQL connectors"))
    }
}

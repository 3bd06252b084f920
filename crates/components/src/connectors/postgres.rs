use super::common::{self, connection_details, filter_list, probe_error};
use super::DEBEZIUM_VERSION;
use crate::config_def::{ConfigDef, ConfigKey, NativeType};
use crate::errors::ProbeError;
use crate::filters::{SCHEMA_EXCLUDE_LIST, SCHEMA_INCLUDE_LIST, TABLE_EXCLUDE_LIST, TABLE_INCLUDE_LIST};
use crate::property::{DefaultValue, PropertyCategory};
use crate::traits::{ConnectorCapability, ConnectorProperties};
use async_trait::async_trait;
use shared_clients::postgres::PostgresAdapter;
use shared_clients::{AsyncDatabaseAdapter, ConnectionDetails, DataCollection};
use std::time::Duration;
use tracing::debug;

pub const CONNECTOR_CLASS_NAME: &str = "io.debezium.connector.postgresql.PostgresConnector";
pub const DATABASE_DBNAME: &str = "database.dbname";
const DEFAULT_PORT: u16 = 5432;

fn definition() -> ConfigDef {
    ConfigDef::new()
        .define_all([
            common::topic_prefix(),
            common::tasks_max(),
            common::hostname(),
            common::port(DEFAULT_PORT as i64),
            common::user(),
            common::password(),
            ConfigKey::new(DATABASE_DBNAME, NativeType::String, PropertyCategory::Connection)
                .display("Database")
                .doc("The name of the database from which the connector should capture changes.")
                .required(),
            ConfigKey::new("database.sslmode", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("SSL mode")
                .doc("Whether to use an encrypted connection to the PostgreSQL server.")
                .default_value(DefaultValue::string("prefer"))
                .allowed(&["disable", "allow", "prefer", "require", "verify-ca", "verify-full"]),
            ConfigKey::new("database.tcpKeepAlive", NativeType::Boolean, PropertyCategory::ConnectionAdvanced)
                .display("TCP keep-alive probe")
                .doc("Enable or disable TCP keep-alive probe to avoid dropping the TCP connection.")
                .default_value(DefaultValue::Boolean(true)),
            ConfigKey::new("database.initial.statements", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Initial statements")
                .doc("A semicolon separated list of SQL statements to be executed when a JDBC connection is established."),
            ConfigKey::new("plugin.name", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Plugin")
                .doc("The name of the Postgres logical decoding plugin installed on the server.")
                .default_value(DefaultValue::string("decoderbufs"))
                .allowed(&["decoderbufs", "pgoutput"]),
            ConfigKey::new("slot.name", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Slot")
                .doc("The name of the Postgres logical decoding slot created for streaming changes from a plugin.")
                .default_value(DefaultValue::string("debezium")),
            ConfigKey::new("slot.drop.on.stop", NativeType::Boolean, PropertyCategory::ConnectionAdvanced)
                .display("Drop slot on stop")
                .doc("Whether or not to drop the logical replication slot when the connector finishes orderly.")
                .default_value(DefaultValue::Boolean(false)),
            ConfigKey::new("slot.max.retries", NativeType::Int, PropertyCategory::ConnectionAdvanced)
                .display("Retry count")
                .doc("How many times to retry connecting to a replication slot when an attempt fails.")
                .default_value(DefaultValue::Int(6))
                .range(Some(0), None),
            ConfigKey::new("slot.retry.delay.ms", NativeType::Long, PropertyCategory::ConnectionAdvanced)
                .display("Retry delay")
                .doc("Time to wait between retry attempts when the connector fails to connect to a replication slot, given in milliseconds.")
                .default_value(DefaultValue::Int(10_000))
                .range(Some(0), None),
            ConfigKey::new("publication.name", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Publication")
                .doc("The name of the Postgres 10+ publication used for streaming changes from a plugin.")
                .default_value(DefaultValue::string("dbz_publication")),
            ConfigKey::new("publication.autocreate.mode", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Publication autocreate mode")
                .doc("Applies only when streaming changes using pgoutput. Determines how creation of a publication should work.")
                .default_value(DefaultValue::string("all_tables"))
                .allowed(&["all_tables", "disabled", "filtered", "no_tables"]),
            filter_list(
                SCHEMA_INCLUDE_LIST,
                "Include Schemas",
                "The schemas for which events should be captured.",
            ),
            filter_list(
                SCHEMA_EXCLUDE_LIST,
                "Exclude Schemas",
                "The schemas for which events must not be captured.",
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
            filter_list(
                "column.include.list",
                "Include Columns",
                "Regular expressions matching columns to include in change events.",
            ),
            filter_list(
                "column.exclude.list",
                "Exclude Columns",
                "Regular expressions matching columns to exclude from change events.",
            ),
            ConfigKey::new("snapshot.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Snapshot mode")
                .doc("The criteria for running a snapshot upon startup of the connector.")
                .default_value(DefaultValue::string("initial"))
                .allowed(&[
                    "always",
                    "initial",
                    "initial_only",
                    "no_data",
                    "never",
                    "when_needed",
                    "configuration_based",
                    "custom",
                ]),
            ConfigKey::new("snapshot.locking.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Snapshot locking mode")
                .doc("Controls how the connector holds locks on tables while performing the schema snapshot.")
                .default_value(DefaultValue::string("none"))
                .allowed(&["shared", "none", "custom"]),
            ConfigKey::new("snapshot.fetch.size", NativeType::Int, PropertyCategory::Advanced)
                .display("Snapshot fetch size")
                .doc("The maximum number of records that should be loaded into memory while performing a snapshot.")
                .range(Some(0), None),
            ConfigKey::new("hstore.handling.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("HStore Handling")
                .doc("Specify how HSTORE columns should be represented in change events.")
                .default_value(DefaultValue::string("json"))
                .allowed(&["json", "map"]),
            ConfigKey::new("interval.handling.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Interval Handling")
                .doc("Specify how INTERVAL columns should be represented in change events.")
                .default_value(DefaultValue::string("numeric"))
                .allowed(&["numeric", "string"]),
            ConfigKey::new("money.fraction.digits", NativeType::Short, PropertyCategory::ConnectorAdvanced)
                .display("Money fraction digits")
                .doc("Number of fractional digits when money type is converted to 'precise' decimal number.")
                .default_value(DefaultValue::Int(2))
                .range(Some(0), Some(i16::MAX as i64)),
        ])
        .define_all(common::runtime_keys())
        .mutually_exclusive(SCHEMA_INCLUDE_LIST, SCHEMA_EXCLUDE_LIST)
        .mutually_exclusive(TABLE_INCLUDE_LIST, TABLE_EXCLUDE_LIST)
}

pub struct PostgresCapability {
    def: ConfigDef,
    probe_timeout: Duration,
}

impl PostgresCapability {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            def: definition(),
            probe_timeout,
        }
    }

    fn details(&self, props: &ConnectorProperties) -> Result<ConnectionDetails, ProbeError> {
        let mut details = connection_details(props, DEFAULT_PORT)?;
        details.database = props.get(DATABASE_DBNAME).cloned();
        Ok(details)
    }

    async fn connect(&self, props: &ConnectorProperties) -> Result<PostgresAdapter, ProbeError> {
        let details = self.details(props)?;
        PostgresAdapter::connect(&details, self.probe_timeout)
            .await
            .map_err(|e| probe_error(e, Some(DATABASE_DBNAME)))
    }
}

#[async_trait]
impl ConnectorCapability for PostgresCapability {
    fn id(&self) -> &'static str {
        "postgres"
    }

    fn class_name(&self) -> &'static str {
        CONNECTOR_CLASS_NAME
    }

    fn display_name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn version(&self) -> &'static str {
        DEBEZIUM_VERSION
    }

    fn enabled(&self) -> bool {
        true
    }

    fn describe(&self) -> &ConfigDef {
        &self.def
    }

    async fn validate_connection(&self, props: &ConnectorProperties) -> Result<(), ProbeError> {
        let adapter = self.connect(props).await?;
        debug!("postgres connection validated");
        drop(adapter);
        Ok(())
    }

    async fn list_data_collections(
        &self,
        props: &ConnectorProperties,
    ) -> Result<Vec<DataCollection>, ProbeError> {
        let adapter = self.connect(props).await?;
        adapter
            .list_collections()
            .await
            .map_err(|e| probe_error(e, Some(DATABASE_DBNAME)))
    }
}

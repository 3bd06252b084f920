use super::common::{self, filter_list, probe_error};
use super::DEBEZIUM_VERSION;
use crate::config_def::{ConfigDef, ConfigKey, NativeType, Validator};
use crate::errors::ProbeError;
use crate::property::{DefaultValue, PropertyCategory};
use crate::traits::{ConnectorCapability, ConnectorProperties};
use async_trait::async_trait;
use shared_clients::tcp::check_reachable;
use shared_clients::{ConnectionDetails, DataCollection};
use std::time::Duration;
use tracing::debug;

pub const CONNECTOR_CLASS_NAME: &str = "io.debezium.connector.mongodb.MongoDbConnector";
pub const CONNECTION_STRING: &str = "mongodb.connection.string";
const DEFAULT_PORT: u16 = 27017;

const DATABASE_INCLUDE_LIST: &str = "database.include.list";
const DATABASE_EXCLUDE_LIST: &str = "database.exclude.list";
const COLLECTION_INCLUDE_LIST: &str = "collection.include.list";
const COLLECTION_EXCLUDE_LIST: &str = "collection.exclude.list";

fn definition() -> ConfigDef {
    ConfigDef::new()
        .define_all([
            common::topic_prefix(),
            common::tasks_max(),
            ConfigKey::new(CONNECTION_STRING, NativeType::String, PropertyCategory::Connection)
                .display("Connection String")
                .doc("Database connection string.")
                .required()
                .validator(Validator::NonEmpty),
            ConfigKey::new("mongodb.user", NativeType::String, PropertyCategory::Connection)
                .display("User")
                .doc("Database user for connecting to MongoDB, if necessary."),
            ConfigKey::new("mongodb.password", NativeType::Password, PropertyCategory::Connection)
                .display("Password")
                .doc("Password to be used when connecting to MongoDB, if necessary."),
            ConfigKey::new("mongodb.authsource", NativeType::String, PropertyCategory::ConnectionAdvanced)
                .display("Credentials Database")
                .doc("Database containing user credentials.")
                .default_value(DefaultValue::string("admin")),
            ConfigKey::new("mongodb.ssl.enabled", NativeType::Boolean, PropertyCategory::ConnectionAdvanced)
                .display("Enable SSL connection to MongoDB")
                .doc("Should connector use SSL to connect to MongoDB instances.")
                .default_value(DefaultValue::Boolean(false)),
            filter_list(
                DATABASE_INCLUDE_LIST,
                "Include Databases",
                "A comma-separated list of regular expressions that match the database names for which changes are to be captured.",
            ),
            filter_list(
                DATABASE_EXCLUDE_LIST,
                "Exclude Databases",
                "A comma-separated list of regular expressions that match the database names for which changes are to be excluded.",
            ),
            filter_list(
                COLLECTION_INCLUDE_LIST,
                "Include Collections",
                "A comma-separated list of regular expressions that match the collection names for which changes are to be captured.",
            ),
            filter_list(
                COLLECTION_EXCLUDE_LIST,
                "Exclude Collections",
                "A comma-separated list of regular expressions that match the collection names for which changes are to be excluded.",
            ),
            ConfigKey::new("capture.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Capture mode")
                .doc("The method used to capture changes from MongoDB server.")
                .default_value(DefaultValue::string("change_streams_update_full"))
                .allowed(&[
                    "change_streams",
                    "change_streams_update_full",
                    "change_streams_with_pre_image",
                    "change_streams_update_full_with_pre_image",
                ]),
            ConfigKey::new("snapshot.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
                .display("Snapshot mode")
                .doc("The criteria for running a snapshot upon startup of the connector.")
                .default_value(DefaultValue::string("initial"))
                .allowed(&["initial", "initial_only", "no_data", "never", "when_needed"]),
        ])
        .define_all(common::runtime_keys())
        .mutually_exclusive(DATABASE_INCLUDE_LIST, DATABASE_EXCLUDE_LIST)
        .mutually_exclusive(COLLECTION_INCLUDE_LIST, COLLECTION_EXCLUDE_LIST)
}

/// First `host:port` of a `mongodb://` connection string. `None` for
/// `mongodb+srv://` strings, whose hosts come from DNS.
pub fn first_host(connection_string: &str) -> Result<Option<(String, u16)>, String> {
    let trimmed = connection_string.trim();
    let rest = if let Some(rest) = trimmed.strip_prefix("mongodb://") {
        rest
    } else if trimmed.starts_with("mongodb+srv://") {
        return Ok(None);
    } else {
        return Err(format!(
            "Connection string must start with mongodb:// or mongodb+srv://, got {trimmed}"
        ));
    };

    let hosts = rest.split(['/', '?']).next().unwrap_or_default();
    let hosts = hosts.rsplit_once('@').map_or(hosts, |(_, h)| h);
    let first = hosts.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        return Err("Connection string does not name a host".to_string());
    }

    let (host, port) = if let Some(bracketed) = first.strip_prefix('[') {
        let (host, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| format!("Malformed IPv6 host in connection string: {first}"))?;
        (host, tail.strip_prefix(':'))
    } else {
        match first.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (first, None),
        }
    };
    let port = match port {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| format!("Invalid port in connection string: {p}"))?,
        None => DEFAULT_PORT,
    };
    Ok(Some((host.to_string(), port)))
}

/// Described for the UI; creating MongoDB connectors is not enabled yet.
pub struct MongoDbCapability {
    def: ConfigDef,
    probe_timeout: Duration,
}

impl MongoDbCapability {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            def: definition(),
            probe_timeout,
        }
    }
}

#[async_trait]
impl ConnectorCapability for MongoDbCapability {
    fn id(&self) -> &'static str {
        "mongodb"
    }

    fn class_name(&self) -> &'static str {
        CONNECTOR_CLASS_NAME
    }

    fn display_name(&self) -> &'static str {
        "MongoDB"
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
        let raw = props.get(CONNECTION_STRING).map(String::as_str).unwrap_or_default();
        let Some((host, port)) =
            first_host(raw).map_err(|e| ProbeError::property(CONNECTION_STRING, e))?
        else {
            debug!("skipping reachability check for a DNS seed list connection string");
            return Ok(());
        };

        let details = ConnectionDetails::new(host, port);
        check_reachable(&details, self.probe_timeout)
            .await
            .map_err(|e| match probe_error(e, None) {
                ProbeError::Property { context, .. } => {
                    ProbeError::property(CONNECTION_STRING, context.message())
                }
                other => other,
            })
    }

    async fn list_data_collections(
        &self,
        _props: &ConnectorProperties,
    ) -> Result<Vec<DataCollection>, ProbeError> {
        Err(ProbeError::unsupported(
            "Listing collections is not supported for MongoDB connectors",
        ))
    }
}

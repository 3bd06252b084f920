//! Keys and helpers shared by the built-in connector definitions.

use crate::config_def::{ConfigKey, NativeType, Validator};
use crate::errors::ProbeError;
use crate::property::{DefaultValue, PropertyCategory};
use crate::traits::ConnectorProperties;
use shared_clients::{ConnectionDetails, DatabaseAdapterError};

pub const DATABASE_HOSTNAME: &str = "database.hostname";
pub const DATABASE_PORT: &str = "database.port";
pub const DATABASE_USER: &str = "database.user";
pub const DATABASE_PASSWORD: &str = "database.password";
pub const TOPIC_PREFIX: &str = "topic.prefix";

pub fn hostname() -> ConfigKey {
    ConfigKey::new(DATABASE_HOSTNAME, NativeType::String, PropertyCategory::Connection)
        .display("Hostname")
        .doc("Resolvable hostname or IP address of the database server.")
        .required()
        .validator(Validator::NonEmpty)
}

pub fn port(default_port: i64) -> ConfigKey {
    ConfigKey::new(DATABASE_PORT, NativeType::Int, PropertyCategory::Connection)
        .display("Port")
        .doc("Port of the database server.")
        .default_value(DefaultValue::Int(default_port))
        .range(Some(1), Some(65535))
}

pub fn user() -> ConfigKey {
    ConfigKey::new(DATABASE_USER, NativeType::String, PropertyCategory::Connection)
        .display("User")
        .doc("Name of the database user to be used when connecting to the database.")
        .required()
}

pub fn password() -> ConfigKey {
    ConfigKey::new(DATABASE_PASSWORD, NativeType::Password, PropertyCategory::Connection)
        .display("Password")
        .doc("Password of the database user to be used when connecting to the database.")
}

pub fn topic_prefix() -> ConfigKey {
    ConfigKey::new(TOPIC_PREFIX, NativeType::String, PropertyCategory::Generic)
        .display("Topic prefix")
        .doc("Topic prefix that identifies and provides a namespace for the particular database server/cluster that is capturing changes. Only alphanumeric characters, hyphens, dots and underscores are accepted.")
        .required()
        .validator(Validator::NonEmpty)
}

pub fn tasks_max() -> ConfigKey {
    ConfigKey::new("tasks.max", NativeType::Int, PropertyCategory::GenericAdvanced)
        .display("Maximum tasks")
        .doc("Maximum number of tasks to use for this connector.")
        .default_value(DefaultValue::Int(1))
        .range(Some(1), None)
}

/// A regex list filter key.
pub fn filter_list(name: &'static str, display: &'static str, doc: &'static str) -> ConfigKey {
    ConfigKey::new(name, NativeType::List, PropertyCategory::Connector)
        .display(display)
        .doc(doc)
        .validator(Validator::RegexList)
}

/// Streaming and error-handling keys every Debezium source connector has.
pub fn runtime_keys() -> Vec<ConfigKey> {
    vec![
        ConfigKey::new("tombstones.on.delete", NativeType::Boolean, PropertyCategory::ConnectorAdvanced)
            .display("Tombstones on delete")
            .doc("Whether delete operations should be represented by a delete event and a subsequent tombstone event.")
            .default_value(DefaultValue::Boolean(true)),
        ConfigKey::new("decimal.handling.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
            .display("Decimal handling")
            .doc("How DECIMAL and NUMERIC columns are represented in change events.")
            .default_value(DefaultValue::string("precise"))
            .allowed(&["precise", "double", "string"]),
        ConfigKey::new("time.precision.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
            .display("Time precision")
            .doc("Time, date and timestamps can be represented with different kinds of precisions.")
            .default_value(DefaultValue::string("adaptive"))
            .allowed(&["adaptive", "adaptive_time_microseconds", "connect"]),
        ConfigKey::new("binary.handling.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
            .display("Binary handling")
            .doc("How binary columns are represented in change events.")
            .default_value(DefaultValue::string("bytes"))
            .allowed(&["bytes", "base64", "base64-url-safe", "hex"]),
        ConfigKey::new("schema.name.adjustment.mode", NativeType::String, PropertyCategory::ConnectorAdvanced)
            .display("Schema name adjustment")
            .doc("Specify how schema names should be adjusted for compatibility with the message converter.")
            .default_value(DefaultValue::string("none"))
            .allowed(&["none", "avro", "avro_unicode"]),
        ConfigKey::new("poll.interval.ms", NativeType::Long, PropertyCategory::Advanced)
            .display("Poll interval (ms)")
            .doc("Time to wait for new change events to appear after receiving no events.")
            .default_value(DefaultValue::Int(500))
            .range(Some(1), None),
        ConfigKey::new("max.queue.size", NativeType::Int, PropertyCategory::Advanced)
            .display("Change event buffer size")
            .doc("Maximum size of the queue for change events read from the database log but not yet recorded or forwarded.")
            .default_value(DefaultValue::Int(8192))
            .range(Some(1), None),
        ConfigKey::new("max.batch.size", NativeType::Int, PropertyCategory::Advanced)
            .display("Change event batch size")
            .doc("Maximum size of each batch of source records.")
            .default_value(DefaultValue::Int(2048))
            .range(Some(1), None),
        ConfigKey::new("heartbeat.interval.ms", NativeType::Int, PropertyCategory::Advanced)
            .display("Connector heartbeat interval (ms)")
            .doc("Length of an interval in milliseconds in which the connector periodically sends heartbeat messages. 0 disables heartbeats.")
            .default_value(DefaultValue::Int(0))
            .range(Some(0), None),
        ConfigKey::new("errors.max.retries", NativeType::Int, PropertyCategory::Advanced)
            .display("The maximum number of retries")
            .doc("The maximum number of retries on connection errors before failing (-1 = no limit, 0 = disabled).")
            .default_value(DefaultValue::Int(-1))
            .range(Some(-1), None),
    ]
}

/// Host and port from the standard `database.*` keys.
pub fn connection_details(
    props: &ConnectorProperties,
    default_port: u16,
) -> Result<ConnectionDetails, ProbeError> {
    let host = props
        .get(DATABASE_HOSTNAME)
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProbeError::property(DATABASE_HOSTNAME, "A value is required"))?;
    let port = match props.get(DATABASE_PORT) {
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
            ProbeError::property(DATABASE_PORT, format!("Invalid port number: {raw}"))
        })?,
        None => default_port,
    };

    let mut details = ConnectionDetails::new(host, port);
    details.user = props.get(DATABASE_USER).cloned();
    details.password = props.get(DATABASE_PASSWORD).cloned();
    Ok(details)
}

/// Attributes database probe failures to the property most likely at fault.
pub fn probe_error(err: DatabaseAdapterError, database_key: Option<&str>) -> ProbeError {
    let message = format!("Error while validating connector config: {}", err.message());
    match err {
        DatabaseAdapterError::Unreachable { .. } | DatabaseAdapterError::Timeout { .. } => {
            ProbeError::property(DATABASE_HOSTNAME, message)
        }
        DatabaseAdapterError::Authentication { .. } => ProbeError::property(DATABASE_USER, message),
        DatabaseAdapterError::UnknownDatabase { .. } => match database_key {
            Some(key) => ProbeError::property(key, message),
            None => ProbeError::failed(err),
        },
        DatabaseAdapterError::Query { .. } => ProbeError::failed(err),
    }
}

use crate::config_def::ConfigDef;
use crate::errors::ProbeError;
use async_trait::async_trait;
use shared_clients::DataCollection;
use std::collections::HashMap;

/// Flat connector configuration with every value already rendered as a string.
pub type ConnectorProperties = HashMap<String, String>;

/// What the gateway needs from one kind of Debezium connector.
#[async_trait]
pub trait ConnectorCapability: Send + Sync {
    /// Short slug used in URLs, e.g. `postgres`.
    fn id(&self) -> &'static str;
    fn class_name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn version(&self) -> &'static str;
    /// Whether callers may create connectors of this type.
    fn enabled(&self) -> bool;

    /// The connector's configuration keys.
    fn describe(&self) -> &ConfigDef;

    /// Live check that the source database is reachable with `props`.
    /// Only called once the connection keys passed declarative validation.
    async fn validate_connection(&self, props: &ConnectorProperties) -> Result<(), ProbeError>;

    /// Lists the data collections of the live source database.
    async fn list_data_collections(
        &self,
        props: &ConnectorProperties,
    ) -> Result<Vec<DataCollection>, ProbeError>;
}

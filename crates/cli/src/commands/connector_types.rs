use common::config::loader::read_config;
use common::error::GatewayError;
use components::connectors::builtin;
use components::ConnectorRegistry;
use std::path::PathBuf;
use tracing::debug;

/// Prints the connector type descriptors as JSON.
pub fn handle_connector_types(config_path: Option<PathBuf>) -> Result<(), GatewayError> {
    let cfg = read_config(config_path).map_err(GatewayError::init)?;
    let registry = ConnectorRegistry::new(builtin(cfg.validation.probe_timeout()))
        .map_err(GatewayError::init)?;
    debug!("{} connector type(s) registered", registry.list().len());
    let json = serde_json::to_string_pretty(&registry.list()).map_err(GatewayError::run)?;
    println!("{json}");
    Ok(())
}

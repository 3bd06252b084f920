use common::config::loader::read_config;
use common::error::GatewayError;
use shared_clients::cluster::ClusterResolver;
use std::path::PathBuf;

/// Prints the configured Kafka Connect clusters with their ordinals.
pub fn handle_clusters(config_path: Option<PathBuf>) -> Result<(), GatewayError> {
    let cfg = read_config(config_path).map_err(GatewayError::init)?;
    let resolver = ClusterResolver::new(cfg.kafka_connect_uris());
    let endpoints = resolver.endpoints().map_err(GatewayError::run)?;
    if endpoints.is_empty() {
        return Err(GatewayError::run_msg(
            "no Kafka Connect clusters configured",
        ));
    }
    for (idx, endpoint) in endpoints.iter().enumerate() {
        println!("{}: {}", idx + 1, endpoint);
    }
    Ok(())
}

use crate::config::components::global::GatewayConfig;
use crate::config::components::kafka_connect::KafkaConnectUris;
use crate::config::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "gateway.yml";
/// Environment variable overriding `kafka_connect.uri` (comma separated).
pub const KAFKA_CONNECT_URI_ENV: &str = "KAFKA_CONNECT_URI";
pub const BIND_ADDR_ENV: &str = "GATEWAY_ADDR";

/// Reads the gateway configuration.
///
/// `config_path` may point at a directory containing `gateway.yml` or at the
/// file itself; an explicitly given path must exist. Without a path the
/// working directory is searched and defaults are used if nothing is found.
/// Environment overrides are applied last.
pub fn read_config(config_path: Option<PathBuf>) -> Result<GatewayConfig, ConfigError> {
    let config = match config_path {
        Some(path) => {
            let file = if path.is_dir() {
                path.join(CONFIG_FILE_NAME)
            } else {
                path
            };
            if !file.exists() {
                return Err(ConfigError::incorrect_path(&file));
            }
            load_file(&file)?
        }
        None => {
            let file = PathBuf::from(CONFIG_FILE_NAME);
            if file.exists() {
                load_file(&file)?
            } else {
                debug!("no {} found, using default configuration", CONFIG_FILE_NAME);
                GatewayConfig::default()
            }
        }
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

fn load_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    info!("loading gateway configuration from {}", path.display());
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(GatewayConfig::default());
    }
    let config: GatewayConfig = serde_yaml::from_str(&contents)?;
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(
    mut config: GatewayConfig,
    lookup: F,
) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uris) = lookup(KAFKA_CONNECT_URI_ENV) {
        debug!("{} overrides kafka_connect.uri", KAFKA_CONNECT_URI_ENV);
        config.kafka_connect.uri = KafkaConnectUris::Joined(uris);
    }
    if let Some(addr) = lookup(BIND_ADDR_ENV) {
        config.server.addr = addr;
    }
    let positive = [
        ("kafka_connect.status_fan_out", config.kafka_connect.status_fan_out as u64),
        ("kafka_connect.connect_timeout_ms", config.kafka_connect.connect_timeout_ms),
        ("kafka_connect.request_timeout_ms", config.kafka_connect.request_timeout_ms),
        ("metrics.timeout_ms", config.metrics.timeout_ms),
        ("validation.probe_timeout_ms", config.validation.probe_timeout_ms),
    ];
    if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigError::invalid_value(key, 0, "must be at least 1"));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::components::kafka_connect::DEFAULT_KAFKA_CONNECT_URI;
    use crate::config::components::metrics::DEFAULT_JOLOKIA_PORT;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_at_local_connect() {
        let cfg = apply_env_overrides(GatewayConfig::default(), no_env).unwrap();
        assert_eq!(cfg.kafka_connect_uris(), vec![DEFAULT_KAFKA_CONNECT_URI]);
        assert_eq!(cfg.metrics.jolokia_port, DEFAULT_JOLOKIA_PORT);
        assert_eq!(cfg.kafka_connect.status_fan_out, 8);
        assert_eq!(cfg.validation.probe_timeout_ms, 5_000);
    }

    #[test]
    fn reads_yaml_with_uri_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(
            file,
            "kafka_connect:\n  uri:\n    - http://connect-a:8083\n    - http://connect-b:8083\n  request_timeout_ms: 500\nmetrics:\n  jolokia_port: 9999\nvalidation:\n  probe_timeout_ms: 250\n"
        )
        .unwrap();

        let cfg = read_config(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(
            cfg.kafka_connect_uris(),
            vec!["http://connect-a:8083", "http://connect-b:8083"]
        );
        assert_eq!(cfg.kafka_connect.request_timeout_ms, 500);
        assert_eq!(cfg.kafka_connect.connect_timeout_ms, 3_000);
        assert_eq!(cfg.metrics.jolokia_port, 9999);
        assert_eq!(cfg.validation.probe_timeout_ms, 250);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        let err = read_config(Some(missing)).unwrap_err();
        assert!(matches!(err, ConfigError::IncorrectPath { .. }));
    }

    #[test]
    fn env_override_wins() {
        let cfg = apply_env_overrides(GatewayConfig::default(), |key| {
            (key == KAFKA_CONNECT_URI_ENV)
                .then(|| "http://localhost:1234, http://localhorst:4567".to_string())
        })
        .unwrap();
        assert_eq!(
            cfg.kafka_connect_uris(),
            vec!["http://localhost:1234", "http://localhorst:4567"]
        );
    }

    #[test]
    fn zero_fan_out_is_rejected() {
        let mut cfg = GatewayConfig::default();
        cfg.kafka_connect.status_fan_out = 0;
        let err = apply_env_overrides(cfg, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let zeroed: [fn(&mut GatewayConfig); 3] = [
            |cfg| cfg.kafka_connect.connect_timeout_ms = 0,
            |cfg| cfg.kafka_connect.request_timeout_ms = 0,
            |cfg| cfg.metrics.timeout_ms = 0,
        ];
        for (zero, key) in zeroed.into_iter().zip([
            "kafka_connect.connect_timeout_ms",
            "kafka_connect.request_timeout_ms",
            "metrics.timeout_ms",
        ]) {
            let mut cfg = GatewayConfig::default();
            zero(&mut cfg);
            let err = apply_env_overrides(cfg, no_env).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
            assert!(err.to_string().contains(key), "{err}");
        }
    }
}

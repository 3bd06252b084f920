pub mod common;
pub mod mongodb;
pub mod mysql;
pub mod postgres;
pub mod sqlserver;

use crate::traits::ConnectorCapability;
use std::sync::Arc;
use std::time::Duration;

/// Debezium release whose connectors the built-in definitions describe.
pub const DEBEZIUM_VERSION: &str = "3.3.1.Final";

/// The connector types the gateway ships with, in listing order.
pub fn builtin(probe_timeout: Duration) -> Vec<Arc<dyn ConnectorCapability>> {
    vec![
        Arc::new(postgres::PostgresCapability::new(probe_timeout)),
        Arc::new(mongodb::MongoDbCapability::new(probe_timeout)),
        Arc::new(mysql::MySqlCapability::new(probe_timeout)),
        Arc::new(sqlserver::SqlServerCapability::new(probe_timeout)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ConnectorRegistry;

    #[test]
    fn builtin_types_register() {
        let registry = ConnectorRegistry::new(builtin(Duration::from_secs(1))).unwrap();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["postgres", "mongodb", "mysql", "sqlserver"]);
        assert!(registry.describe("postgres").unwrap().enabled);
        assert!(!registry.describe("mysql").unwrap().enabled);
        assert!(registry.is_supported_class("io.debezium.connector.sqlserver.SqlServerConnector"));
    }
}

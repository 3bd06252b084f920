use crate::{AsyncDatabaseAdapter, ConnectionDetails, DataCollection, DatabaseAdapterError};
use async_trait::async_trait;
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Config, Error, NoTls};
use tracing::{debug, warn};

const LIST_TABLES_SQL: &str = "SELECT table_schema, table_name \
     FROM information_schema.tables \
     WHERE table_type = 'BASE TABLE' \
       AND table_schema NOT IN ('pg_catalog', 'information_schema') \
     ORDER BY table_schema, table_name";

fn classify(err: Error, details: &ConnectionDetails) -> DatabaseAdapterError {
    match err.code() {
        Some(code)
            if *code == SqlState::INVALID_PASSWORD
                || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION =>
        {
            DatabaseAdapterError::authentication(err.to_string())
        }
        Some(code) if *code == SqlState::INVALID_CATALOG_NAME => {
            DatabaseAdapterError::unknown_database(err.to_string())
        }
        Some(_) => DatabaseAdapterError::query(err),
        None => DatabaseAdapterError::unreachable(
            format!("Unable to connect to {}: {}", details.address(), err),
            err,
        ),
    }
}

pub struct PostgresAdapter {
    client: Client,
    _driver: tokio::task::JoinHandle<()>, // keeps the connection alive
}

impl PostgresAdapter {
    /// Connects and spawns the connection driver in the background.
    pub async fn connect(
        details: &ConnectionDetails,
        limit: Duration,
    ) -> Result<Self, DatabaseAdapterError> {
        let mut config = Config::new();
        config
            .host(&details.host)
            .port(details.port)
            .connect_timeout(limit)
            .application_name("connect-gateway");
        if let Some(db) = &details.database {
            config.dbname(db);
        }
        if let Some(user) = &details.user {
            config.user(user);
        }
        if let Some(password) = &details.password {
            config.password(password);
        }

        let (client, connection) = tokio::time::timeout(limit, config.connect(NoTls))
            .await
            .map_err(|_| {
                DatabaseAdapterError::timeout(format!(
                    "Connecting to {} timed out after {}ms",
                    details.address(),
                    limit.as_millis()
                ))
            })?
            .map_err(|e| classify(e, details))?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("postgres connection closed with error: {e}");
            }
        });
        debug!("connected to postgres at {}", details.address());

        Ok(Self {
            client,
            _driver: driver,
        })
    }
}

#[async_trait]
impl AsyncDatabaseAdapter for PostgresAdapter {
    async fn list_collections(&self) -> Result<Vec<DataCollection>, DatabaseAdapterError> {
        let rows = self
            .client
            .query(LIST_TABLES_SQL, &[])
            .await
            .map_err(DatabaseAdapterError::query)?;
        rows.iter()
            .map(|row| {
                let schema: String = row.try_get(0).map_err(DatabaseAdapterError::query)?;
                let table: String = row.try_get(1).map_err(DatabaseAdapterError::query)?;
                Ok(DataCollection::new(schema, table))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut details = ConnectionDetails::new("127.0.0.1", port);
        details.user = Some("postgres".into());
        let err = PostgresAdapter::connect(&details, Duration::from_secs(2))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DatabaseAdapterError::Unreachable { .. }));
    }
}

pub mod cluster;
pub mod jolokia;
pub mod kafka;
pub mod postgres;
pub mod tcp;

use async_trait::async_trait;
use common::error::diagnostics::DiagnosticMessage;
use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;

/// Where a connector's source database lives, as taken from its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionDetails {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            database: None,
            user: None,
            password: None,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A table (or collection) living in a source database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DataCollection {
    pub namespace: String,
    pub name: String,
}

impl DataCollection {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `namespace.name`, the form table include/exclude lists match against.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

#[derive(Debug, Error)]
pub enum DatabaseAdapterError {
    #[error("database unreachable: {context}")]
    Unreachable {
        context: DiagnosticMessage,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    #[error("authentication failed: {context}")]
    Authentication { context: DiagnosticMessage },
    #[error("unknown database: {context}")]
    UnknownDatabase { context: DiagnosticMessage },
    #[error("query failed: {context}")]
    Query {
        context: DiagnosticMessage,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    #[error("timed out: {context}")]
    Timeout { context: DiagnosticMessage },
}

impl DatabaseAdapterError {
    #[track_caller]
    pub fn unreachable<E>(message: impl Into<String>, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Unreachable {
            context: DiagnosticMessage::new(message.into()),
            source: Some(Box::new(err)),
        }
    }

    #[track_caller]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn unknown_database(message: impl Into<String>) -> Self {
        Self::UnknownDatabase {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn query<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Query {
            context: DiagnosticMessage::new(err.to_string()),
            source: Some(Box::new(err)),
        }
    }

    #[track_caller]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    /// Message without the call-site suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::Unreachable { context, .. }
            | Self::Authentication { context }
            | Self::UnknownDatabase { context }
            | Self::Query { context, .. }
            | Self::Timeout { context } => context.message(),
        }
    }
}

/// Read-only view of a source database used by connection and filter probes.
#[async_trait]
pub trait AsyncDatabaseAdapter: Send + Sync {
    /// Lists the user tables of the connected database.
    async fn list_collections(&self) -> Result<Vec<DataCollection>, DatabaseAdapterError>;
}

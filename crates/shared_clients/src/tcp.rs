use crate::{ConnectionDetails, DatabaseAdapterError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Checks that something accepts TCP connections at the database address.
pub async fn check_reachable(
    details: &ConnectionDetails,
    limit: Duration,
) -> Result<(), DatabaseAdapterError> {
    let address = details.address();
    match timeout(limit, TcpStream::connect((details.host.as_str(), details.port))).await {
        Ok(Ok(_stream)) => {
            debug!("{} is reachable", address);
            Ok(())
        }
        Ok(Err(e)) => Err(DatabaseAdapterError::unreachable(
            format!("Unable to connect to {address}: {e}"),
            e,
        )),
        Err(_) => Err(DatabaseAdapterError::timeout(format!(
            "Connecting to {address} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

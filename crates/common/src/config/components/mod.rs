pub mod global;
pub mod kafka_connect;
pub mod metrics;
pub mod server;
pub mod validation;

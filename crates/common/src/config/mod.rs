pub mod components;
pub mod error;
pub mod loader;

pub use components::global::GatewayConfig;
pub use error::ConfigError;
pub use loader::read_config;

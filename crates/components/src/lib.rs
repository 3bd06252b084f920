//! Connector type definitions, the registry that serves them and the
//! validation pipeline that checks connector configs against them.

pub mod config_def;
pub mod connectors;
pub mod errors;
pub mod filters;
pub mod pipeline;
pub mod property;
pub mod registry;
pub mod traits;
pub mod validation;

pub use errors::{PipelineError, ProbeError, RegistryError};
pub use pipeline::ValidationPipeline;
pub use registry::{ConnectorRegistry, ConnectorTypeDescriptor};
pub use traits::{ConnectorCapability, ConnectorProperties};

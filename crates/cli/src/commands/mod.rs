pub mod clusters;
pub mod connector_types;
pub mod serve;

pub use clusters::handle_clusters;
pub use connector_types::handle_connector_types;
pub use serve::{handle_serve, ServeArgs};

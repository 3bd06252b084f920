pub mod connector;
pub mod status;
pub mod transform;

pub use connector::*;
pub use status::*;
pub use transform::*;

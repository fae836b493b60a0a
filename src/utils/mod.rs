pub mod constants;
pub mod tenant;
pub mod tracing;

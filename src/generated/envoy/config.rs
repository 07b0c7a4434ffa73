pub mod core;
pub mod endpoint;

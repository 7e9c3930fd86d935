//! Lifecycle management (startup, shutdown)

pub mod shutdown;
pub mod startup;

pub use startup::{StartupContext, prepare_server_startup};

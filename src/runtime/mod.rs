//! Runtime module
//!
//! Application lifecycle and execution modes:
//! - `lifetime`: startup wiring and graceful shutdown
//! - `modes`: entry points (HTTP server)

pub mod lifetime;
pub mod modes;

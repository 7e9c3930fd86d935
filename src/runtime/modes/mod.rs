//! Mode routing
//!
//! The binary only serves HTTP; management subcommands (`config`, `user`)
//! run inline in `main` and exit.

pub mod server;

pub use server::run_server;

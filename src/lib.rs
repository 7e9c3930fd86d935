//! Device Profiles - multi-tenant device profile backend
//!
//! Users authenticate with HTTP Basic credentials and manage their own
//! device profiles, optionally materialized from a shared catalog of
//! device templates.
//!
//! # Architecture
//! - `storage`: SeaORM backed stores for users, templates and profiles
//! - `services`: credential verification, validation, ownership rules
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: management CLI
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

pub mod health;
pub mod helpers;
pub mod profiles;
pub mod routes;
pub mod templates;
pub mod types;

pub use health::{AppStartTime, HealthService};
pub use helpers::{json_config, path_config, query_config};
pub use routes::{configure, health_routes};

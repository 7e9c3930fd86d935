pub mod auth;
pub mod request_id;

pub use auth::BasicAuth;
pub use request_id::{RequestId, RequestIdMiddleware};

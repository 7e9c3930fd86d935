//! actix-web transport: middleware, handlers, DTOs and routes.

pub mod middleware;
pub mod services;

//! Service layer for business logic
//!
//! Services receive their stores through the constructor and classify every
//! storage failure with `map_repo_err` before returning it.

pub mod auth;
pub mod profiles;
pub mod templates;
pub mod validation;

pub use auth::CredentialVerifier;
pub use profiles::ProfileService;
pub use templates::TemplateService;

//! 路由配置

use actix_web::web;

use super::health::HealthService;
use super::profiles::{
    create_device_profile, delete_device_profile, get_device_profile, list_device_profiles,
    update_device_profile,
};
use super::templates::list_device_templates;
use crate::api::middleware::BasicAuth;

/// Health 路由（无需认证）
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
        .route("/health/ready", web::get().to(HealthService::readiness_check))
        .route("/health/live", web::get().to(HealthService::liveness_check));
}

/// Registers every route on an `App`.
///
/// Device routes sit behind Basic authentication:
/// - GET /device-templates
/// - GET/POST /device-profiles
/// - GET/PUT/DELETE /device-profiles/{id}
pub fn configure(auth: BasicAuth) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        health_routes(cfg);
        cfg.service(
            web::scope("")
                .wrap(auth)
                .route("/device-templates", web::get().to(list_device_templates))
                .route("/device-profiles", web::get().to(list_device_profiles))
                .route("/device-profiles", web::post().to(create_device_profile))
                .route("/device-profiles/{id}", web::get().to(get_device_profile))
                .route("/device-profiles/{id}", web::put().to(update_device_profile))
                .route("/device-profiles/{id}", web::delete().to(delete_device_profile)),
        );
    }
}

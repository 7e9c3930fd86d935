//! `/device-templates` handlers

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::api::services::helpers::api_result;
use crate::api::services::types::TemplateResponse;
use crate::services::TemplateService;
use crate::storage::RequestIdentity;

pub async fn list_device_templates(
    _identity: RequestIdentity,
    service: web::Data<TemplateService>,
) -> HttpResponse {
    trace!("API: list device templates");

    let result = service.list_templates().await.map(|templates| {
        templates
            .into_iter()
            .map(TemplateResponse::from)
            .collect::<Vec<_>>()
    });
    api_result::<_, Vec<TemplateResponse>>(StatusCode::OK, result)
}

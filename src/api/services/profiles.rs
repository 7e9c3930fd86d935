//! `/device-profiles` handlers

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::api::services::helpers::{api_result, error_response};
use crate::api::services::types::{
    CreateProfileRequest, ListProfilesQuery, ProfileResponse, UpdateProfileRequest,
};
use crate::services::ProfileService;
use crate::storage::RequestIdentity;

/// GET /device-profiles?page=&page_size=
pub async fn list_device_profiles(
    identity: RequestIdentity,
    query: web::Query<ListProfilesQuery>,
    service: web::Data<ProfileService>,
) -> HttpResponse {
    trace!("API: list device profiles {:?}", query);

    let result = service
        .list_device_profiles(&identity, query.page(), query.page_size())
        .await
        .map(|items| {
            items
                .into_iter()
                .map(ProfileResponse::from)
                .collect::<Vec<_>>()
        });
    api_result::<_, Vec<ProfileResponse>>(StatusCode::OK, result)
}

/// POST /device-profiles
pub async fn create_device_profile(
    identity: RequestIdentity,
    body: web::Json<CreateProfileRequest>,
    service: web::Data<ProfileService>,
) -> HttpResponse {
    trace!("API: create device profile");

    let profile = match body.into_inner().into_profile() {
        Ok(profile) => profile,
        Err(e) => return error_response(&e),
    };

    let result = service.create_device_profile(&identity, profile).await;
    api_result::<_, ProfileResponse>(StatusCode::CREATED, result)
}

/// GET /device-profiles/{id}
pub async fn get_device_profile(
    identity: RequestIdentity,
    path: web::Path<String>,
    service: web::Data<ProfileService>,
) -> HttpResponse {
    let id = path.into_inner();
    trace!("API: get device profile {}", id);

    let result = service.get_device_profile(&identity, &id).await;
    api_result::<_, ProfileResponse>(StatusCode::OK, result)
}

/// PUT /device-profiles/{id}，只更新请求中出现的字段
pub async fn update_device_profile(
    identity: RequestIdentity,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
    service: web::Data<ProfileService>,
) -> HttpResponse {
    let id = path.into_inner();
    trace!("API: update device profile {}", id);

    let result = service
        .patch_device_profile(&identity, &id, body.into_inner().into())
        .await;
    api_result::<_, ProfileResponse>(StatusCode::OK, result)
}

/// DELETE /device-profiles/{id}
pub async fn delete_device_profile(
    identity: RequestIdentity,
    path: web::Path<String>,
    service: web::Data<ProfileService>,
) -> HttpResponse {
    let id = path.into_inner();
    trace!("API: delete device profile {}", id);

    match service.delete_device_profile(&identity, &id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

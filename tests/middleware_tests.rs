//! Middleware tests: Basic authentication and request ids
//!
//! Uses a stub handler that echoes the resolved identity, so the middleware
//! can be checked without any storage.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, web};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sea_orm::DbErr;

use device_profiles::api::middleware::{BasicAuth, RequestId, RequestIdMiddleware};
use device_profiles::api::services::types::ErrorBody;
use device_profiles::services::CredentialVerifier;
use device_profiles::storage::{CredentialStore, RequestIdentity, StoredCredentials};
use device_profiles::utils::password::hash_password;

const USER_ID: &str = "0b6f7a52-3b8e-4f43-9a9e-6f1d2c7e5a10";

struct StaticCredentials {
    users: HashMap<String, StoredCredentials>,
}

#[async_trait]
impl CredentialStore for StaticCredentials {
    async fn retrieve_credentials(&self, username: &str) -> Result<StoredCredentials, DbErr> {
        Ok(self.users.get(username).cloned().unwrap_or_default())
    }
}

fn auth() -> BasicAuth {
    let mut users = HashMap::new();
    users.insert(
        "carol".to_string(),
        StoredCredentials {
            id: USER_ID.to_string(),
            password_hash: hash_password("carol-password").unwrap(),
        },
    );
    let verifier = Arc::new(CredentialVerifier::new(Arc::new(StaticCredentials { users })));
    BasicAuth::new(verifier, "test-realm")
}

async fn whoami(identity: RequestIdentity) -> HttpResponse {
    HttpResponse::Ok().body(identity.as_str().to_string())
}

async fn request_id_echo(req: HttpRequest) -> HttpResponse {
    let id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();
    HttpResponse::Ok().body(id)
}

fn basic(raw: &str) -> String {
    format!("Basic {}", STANDARD.encode(raw))
}

#[actix_rt::test]
async fn test_valid_credentials_reach_handler() {
    let app = test::init_service(
        App::new().service(web::scope("").wrap(auth()).route("/me", web::get().to(whoami))),
    )
    .await;

    let req = TestRequest::get()
        .uri("/me")
        .insert_header((AUTHORIZATION, basic("carol:carol-password")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(body, USER_ID.as_bytes());
}

#[actix_rt::test]
async fn test_rejections_share_one_shape() {
    let app = test::init_service(
        App::new().service(web::scope("").wrap(auth()).route("/me", web::get().to(whoami))),
    )
    .await;

    let headers = [
        None,
        Some(basic("carol:wrong")),
        Some(basic("nobody:carol-password")),
        Some(basic("carol")),
        Some(basic(":carol-password")),
        Some("Digest abc".to_string()),
    ];

    for header in headers {
        let mut req = TestRequest::get().uri("/me");
        if let Some(value) = &header {
            req = req.insert_header((AUTHORIZATION, value.clone()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(
            resp.headers()
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Basic realm=\"test-realm\"")
        );
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(
            body,
            ErrorBody {
                code: "NOT_AUTHORIZED".to_string(),
                message: "unauthorized".to_string(),
            }
        );
    }
}

#[actix_rt::test]
async fn test_identity_extractor_without_middleware_is_401() {
    let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_request_id_generated_and_echoed() {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .route("/id", web::get().to(request_id_echo)),
    )
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/id").to_request()).await;
    let header = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(uuid::Uuid::parse_str(&header).is_ok());

    let body = test::read_body(resp).await;
    assert_eq!(body, header.as_bytes());
}

#[actix_rt::test]
async fn test_upstream_request_id_is_kept_when_sane() {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .route("/id", web::get().to(request_id_echo)),
    )
    .await;

    let req = TestRequest::get()
        .uri("/id")
        .insert_header(("x-request-id", "edge-1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("edge-1234")
    );

    let oversized = "a".repeat(200);
    let req = TestRequest::get()
        .uri("/id")
        .insert_header(("x-request-id", oversized.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let echoed = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_ne!(echoed, oversized);
    assert!(uuid::Uuid::parse_str(&echoed).is_ok());
}

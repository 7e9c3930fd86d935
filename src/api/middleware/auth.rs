//! HTTP Basic authentication
//!
//! Resolves `Authorization: Basic ...` through the `CredentialVerifier` and
//! stores the resulting `RequestIdentity` in the request extensions. Every
//! failure produces the same 401 response so callers cannot tell an unknown
//! user from a wrong password.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::header::{AUTHORIZATION, WWW_AUTHENTICATE},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info, trace};

use crate::api::services::types::ErrorBody;
use crate::services::CredentialVerifier;
use crate::storage::RequestIdentity;

/// Splits a Basic credentials header into `(username, password)`.
///
/// Returns `None` for other schemes, bad base64, non UTF-8 payloads, a
/// missing colon, or an empty username/password.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

fn unauthorized_body() -> ErrorBody {
    ErrorBody {
        code: "NOT_AUTHORIZED".to_string(),
        message: "unauthorized".to_string(),
    }
}

pub fn unauthorized_response(realm: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", realm)))
        .json(unauthorized_body())
}

/// Basic 认证中间件工厂
#[derive(Clone)]
pub struct BasicAuth {
    verifier: Arc<CredentialVerifier>,
    realm: Arc<str>,
}

impl BasicAuth {
    pub fn new(verifier: Arc<CredentialVerifier>, realm: &str) -> Self {
        Self {
            verifier,
            realm: Arc::from(realm),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BasicAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
            realm: self.realm.clone(),
        }))
    }
}

pub struct BasicAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<CredentialVerifier>,
    realm: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let verifier = self.verifier.clone();
        let realm = self.realm.clone();

        Box::pin(async move {
            let credentials = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(parse_basic_credentials);

            let Some((username, password)) = credentials else {
                debug!("Missing or malformed Basic credentials");
                return Ok(req.into_response(unauthorized_response(&realm).map_into_right_body()));
            };

            match verifier.check_credentials(&username, &password).await {
                Ok(Some(user_id)) => {
                    trace!("Basic authentication succeeded for '{}'", username);
                    req.extensions_mut().insert(RequestIdentity::new(user_id));
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Ok(None) => {
                    info!("Basic authentication failed for '{}'", username);
                    Ok(req.into_response(unauthorized_response(&realm).map_into_right_body()))
                }
                Err(e) => {
                    info!("Basic authentication rejected for '{}': {}", username, e);
                    Ok(req.into_response(unauthorized_response(&realm).map_into_right_body()))
                }
            }
        })
    }
}

/// Handlers receive the caller identity as an extractor; absent → 401.
impl FromRequest for RequestIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<RequestIdentity>() {
            Some(identity) => ready(Ok(identity.clone())),
            None => {
                let resp = HttpResponse::Unauthorized().json(unauthorized_body());
                ready(Err(
                    InternalError::from_response("missing caller identity", resp).into(),
                ))
            }
        }
    }
}

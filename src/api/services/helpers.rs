//! HTTP 帮助函数

use actix_web::HttpResponse;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, web};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{AppError, ErrorKind};

use super::types::ErrorBody;

/// 领域错误类别 → HTTP 状态码
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::NotAuthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// Internal errors are logged with their cause and answered generically.
pub fn error_response(err: &AppError) -> HttpResponse {
    let kind = err.kind();
    let message = match kind {
        ErrorKind::Internal => {
            error!("Request failed: {}", err);
            "internal error".to_string()
        }
        _ => {
            warn!("Request rejected: {}", err);
            err.message().to_string()
        }
    };

    json_response(
        status_for(kind),
        &ErrorBody {
            code: err.code().to_string(),
            message,
        },
    )
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T, U>(status: StatusCode, result: Result<T, AppError>) -> HttpResponse
where
    T: Into<U>,
    U: Serialize,
{
    match result {
        Ok(data) => json_response(status, &data.into()),
        Err(e) => error_response(&e),
    }
}

fn bad_request<E>(err: E, message: &str) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let resp = error_response(&AppError::invalid_argument(message));
    InternalError::from_response(err, resp).into()
}

/// Malformed bodies, query strings and path segments become 400 INVALID_ARGUMENT.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| bad_request(err, "invalid request body"))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| bad_request(err, "invalid query parameters"))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| bad_request(err, "invalid path parameter"))
}

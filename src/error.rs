use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::cache::CacheError;
use crate::crm::CrmError;

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    SessionExpired,
    InvalidCredentials,
    InvalidRequest(String),
    CacheUnavailable,
    CrmUnavailable,
    InternalServerError,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        error!(error = %e, "cache operation failed");
        if e.is_connectivity() {
            AppError::CacheUnavailable
        } else {
            AppError::InternalServerError
        }
    }
}

impl From<CrmError> for AppError {
    fn from(e: CrmError) -> Self {
        error!(error = %e, "crm call failed");
        match e {
            CrmError::UnknownUser(_) => AppError::InvalidCredentials,
            CrmError::Http(_) => AppError::CrmUnavailable,
            CrmError::Hash(_) => AppError::InternalServerError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "未授权访问".to_string()),
            AppError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, "会话已过期，请重新登录".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "用户名或密码错误".to_string())
            }
            AppError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::CacheUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "缓存服务不可用".to_string(),
            ),
            AppError::CrmUnavailable => (
                StatusCode::BAD_GATEWAY,
                "用户资料服务不可用".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "内部服务器错误".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16() as i32,
            error_message,
        });

        (status, body).into_response()
    }
}

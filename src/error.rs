// 错误类型
// `StoreError` 描述存储层失败，`ApiError` 是对外的 HTTP 错误分类

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    LockPoisoned,
    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode query parameter: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 对外错误分类，只暴露固定的提示文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorEnvelope {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

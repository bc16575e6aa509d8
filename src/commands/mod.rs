// HTTP 命令模块
// 提供供前端调用的接口、路由与跨域处理

pub mod categories;
pub mod questions;
pub mod quizzes;

use axum::extract::rejection::JsonRejection;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::error::{ApiError, StoreError};
use crate::services::DatabaseService;

pub use categories::get_categories;
pub use questions::{
    create_question, delete_question, get_questions, get_questions_by_category, search_questions,
};
pub use quizzes::play_quiz;

/// 应用状态，处理函数通过它拿到数据库句柄
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
}

impl AppState {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }
}

/// 构建全部路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/:id/questions", get(get_questions_by_category))
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/:id", delete(delete_question))
        .route("/quizzes", post(play_quiz))
        .fallback(unknown_route)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound
}

/// 允许任意来源跨域访问，预检请求直接返回
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,PATCH,POST,DELETE,OPTIONS"),
    );
}

/// 记录存储层错误并换成对外错误码
fn store_failure(operation: &'static str, mapped: ApiError) -> impl FnOnce(StoreError) -> ApiError {
    move |err| {
        log::error!("{} failed: {}", operation, err);
        mapped
    }
}

/// 请求体无法解析：语法或内容类型错误为 400，字段类型不符按接口约定处理
fn body_rejection(operation: &'static str, rejection: JsonRejection, on_data_error: ApiError) -> ApiError {
    log::warn!("{}: rejected request body: {}", operation, rejection.body_text());
    match rejection {
        JsonRejection::JsonDataError(_) => on_data_error,
        _ => ApiError::BadRequest,
    }
}

/// 路径中的 id 不是整数时视为资源不存在
fn parse_path_id(operation: &'static str, raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        log::warn!("{}: invalid id {:?}", operation, raw);
        ApiError::NotFound
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_id() {
        assert_eq!(parse_path_id("test", "12"), Ok(12));
        assert_eq!(parse_path_id("test", "twelve"), Err(ApiError::NotFound));
    }

    #[test]
    fn test_cors_headers() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers);

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET,PATCH,POST,DELETE,OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type,Authorization");
    }

    #[test]
    fn test_store_failure_maps_code() {
        let map = store_failure("test", ApiError::Unprocessable);
        assert_eq!(map(StoreError::LockPoisoned), ApiError::Unprocessable);
    }
}

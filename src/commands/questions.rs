// 题目接口
// 列表、分类筛选、搜索、创建与删除

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::categories::category_map;
use super::{body_rejection, parse_path_id, store_failure, AppState};
use crate::error::{ApiError, StoreError};
use crate::models::{lenient_i64, NewQuestion, Question};
use crate::services::{paginate, parse_page};

/// `?page=N`，原样接收字符串以便容错解析
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 查询串无法解析（如重复的 page）时同样按第 1 页处理
fn requested_page(query: Result<Query<PageQuery>, QueryRejection>) -> usize {
    match query {
        Ok(Query(query)) => parse_page(query.page.as_deref()),
        Err(rejection) => {
            log::warn!("ignoring unparseable query string: {}", rejection.body_text());
            1
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionPageResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: Map<String, Value>,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: i64,
}

/// 搜索接口沿用前端的驼峰字段名
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_question_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub created_question: i64,
}

/// 新建题目请求，字段缺失时视为插入失败
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub difficulty: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub category: Option<i64>,
}

impl CreateQuestionRequest {
    pub fn into_new_question(self) -> Option<NewQuestion> {
        Some(NewQuestion {
            question: self.question?,
            answer: self.answer?,
            difficulty: self.difficulty?,
            category: self.category?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// GET /questions?page=N
pub async fn get_questions(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<QuestionPageResponse>, ApiError> {
    let page = requested_page(query);

    let questions = state
        .db
        .list_questions()
        .map_err(store_failure("list questions", ApiError::NotFound))?;
    let categories = state
        .db
        .list_categories()
        .map_err(store_failure("list categories", ApiError::NotFound))?;

    if categories.is_empty() {
        log::warn!("no categories available");
        return Err(ApiError::NotFound);
    }

    // 超出范围的页码同样视为不存在
    let current = paginate(&questions, page);
    if current.is_empty() {
        log::warn!("page {} is empty ({} questions in total)", page, questions.len());
        return Err(ApiError::NotFound);
    }

    log::debug!("page {}: {} of {} questions", page, current.len(), questions.len());
    Ok(Json(QuestionPageResponse {
        success: true,
        questions: current,
        total_questions: questions.len(),
        categories: category_map(&categories),
        current_category: None,
    }))
}

/// DELETE /questions/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_path_id("delete question", &raw_id)?;

    match state.db.delete_question(id) {
        Ok(()) => {
            log::info!("deleted question {}", id);
            Ok(Json(DeleteResponse {
                success: true,
                deleted_question_id: id,
            }))
        }
        Err(StoreError::NotFound(_)) => {
            log::warn!("delete question: {} does not exist", id);
            Err(ApiError::NotFound)
        }
        Err(err) => Err(store_failure("delete question", ApiError::NotFound)(err)),
    }
}

/// POST /questions
pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let Json(request) =
        body.map_err(|rejection| body_rejection("create question", rejection, ApiError::NotFound))?;

    let new_question = request.into_new_question().ok_or_else(|| {
        log::warn!("create question: missing required fields");
        ApiError::NotFound
    })?;

    let id = state
        .db
        .insert_question(&new_question)
        .map_err(store_failure("create question", ApiError::NotFound))?;

    log::info!("created question {} in category {}", id, new_question.category);
    Ok(Json(CreateResponse {
        success: true,
        created_question: id,
    }))
}

/// POST /questions/search?page=N
pub async fn search_questions(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) =
        body.map_err(|rejection| body_rejection("search questions", rejection, ApiError::NotFound))?;

    // 空关键字会匹配全部题目，直接拒绝
    let term = match request.search_term {
        Some(term) if !term.is_empty() => term,
        _ => {
            log::warn!("search questions: empty search term");
            return Err(ApiError::NotFound);
        }
    };

    let selection = state
        .db
        .search_questions(&term)
        .map_err(store_failure("search questions", ApiError::NotFound))?;

    log::debug!("search {:?}: {} match(es)", term, selection.len());
    Ok(Json(SearchResponse {
        success: true,
        questions: paginate(&selection, requested_page(query)),
        total_questions: selection.len(),
        current_category: None,
    }))
}

/// GET /categories/{id}/questions
pub async fn get_questions_by_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<CategoryQuestionsResponse>, ApiError> {
    let category = parse_path_id("questions by category", &raw_id)?;

    let questions = state
        .db
        .list_questions_by_category(category)
        .map_err(store_failure("questions by category", ApiError::NotFound))?;

    log::debug!("category {}: {} question(s)", category, questions.len());
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category,
    }))
}

// 测验接口

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{store_failure, AppState};
use crate::error::ApiError;
use crate::models::{Question, QuizCategory};
use crate::services::{next_question, QuizScope};

/// 两个字段都必须出现
#[derive(Debug, Deserialize)]
pub struct PlayQuizRequest {
    pub quiz_category: Option<QuizCategory>,
    pub previous_questions: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct PlayQuizResponse {
    pub success: bool,
    pub question: Option<Question>,
}

/// POST /quizzes
///
/// 返回一道未出过的题目；没有剩余题目时 `question` 为 null，表示本轮结束
pub async fn play_quiz(
    State(state): State<AppState>,
    body: Result<Json<PlayQuizRequest>, JsonRejection>,
) -> Result<Json<PlayQuizResponse>, ApiError> {
    // 请求体任何问题都按 422 处理
    let Json(request) = body.map_err(|rejection| {
        log::warn!("play quiz: rejected request body: {}", rejection.body_text());
        ApiError::Unprocessable
    })?;

    let (category, previous_questions) = match (request.quiz_category, request.previous_questions) {
        (Some(category), Some(previous)) => (category, previous),
        _ => {
            log::warn!("play quiz: quiz_category and previous_questions are required");
            return Err(ApiError::Unprocessable);
        }
    };

    let scope = QuizScope::from_category(&category).ok_or_else(|| {
        log::warn!("play quiz: category {:?} has no id", category.kind);
        ApiError::Unprocessable
    })?;

    let question = next_question(&state.db, scope, &previous_questions, &mut rand::thread_rng())
        .map_err(store_failure("play quiz", ApiError::Unprocessable))?;

    if question.is_none() {
        log::debug!("play quiz: {:?} exhausted after {} question(s)", scope, previous_questions.len());
    }

    Ok(Json(PlayQuizResponse {
        success: true,
        question,
    }))
}

// 分类接口

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{store_failure, AppState};
use crate::error::ApiError;
use crate::models::Category;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Map<String, Value>,
}

/// `{id: type}` 映射，保持查询的类型名顺序
pub(crate) fn category_map(categories: &[Category]) -> Map<String, Value> {
    categories
        .iter()
        .map(|c| (c.id.to_string(), Value::String(c.kind.clone())))
        .collect()
}

/// GET /categories
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state
        .db
        .list_categories()
        .map_err(store_failure("list categories", ApiError::NotFound))?;

    if categories.is_empty() {
        log::warn!("no categories available");
        return Err(ApiError::NotFound);
    }

    log::debug!("listing {} categories", categories.len());
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(&categories),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_map_keeps_order() {
        let categories = vec![
            Category { id: 2, kind: "Art".to_string() },
            Category { id: 5, kind: "Entertainment".to_string() },
            Category { id: 1, kind: "Science".to_string() },
        ];

        let map = category_map(&categories);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["2", "5", "1"]);
        assert_eq!(map["1"], "Science");
    }
}

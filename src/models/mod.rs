// 数据模型
// 题目、分类以及测验请求中携带的分类信息

use serde::{Deserialize, Deserializer, Serialize};

/// 测验中表示"全部分类"的分类类型
pub const ALL_CATEGORIES_SENTINEL: &str = "click";

/// 题目记录，序列化结果即对外的题目格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

/// 待插入的题目（id 由数据库生成）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

/// 分类记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 测验请求中的分类
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizCategory {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl QuizCategory {
    pub fn is_all_categories(&self) -> bool {
        self.kind == ALL_CATEGORIES_SENTINEL
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

/// 接受 JSON 数字或数字字符串，前端下拉框常以字符串提交 id
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IntOrText>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(IntOrText::Int(value)) => Ok(Some(value)),
        Some(IntOrText::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {:?}", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_format() {
        let question = Question {
            id: 7,
            question: "What is the heaviest organ in the human body?".to_string(),
            answer: "The Liver".to_string(),
            difficulty: 4,
            category: 1,
        };

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "question": "What is the heaviest organ in the human body?",
                "answer": "The Liver",
                "difficulty": 4,
                "category": 1
            })
        );
    }

    #[test]
    fn test_quiz_category_accepts_string_id() {
        let category: QuizCategory =
            serde_json::from_str(r#"{"id": "3", "type": "Geography"}"#).unwrap();
        assert_eq!(category.id, Some(3));
        assert!(!category.is_all_categories());
    }

    #[test]
    fn test_quiz_category_click_without_id() {
        let category: QuizCategory = serde_json::from_str(r#"{"type": "click"}"#).unwrap();
        assert_eq!(category.id, None);
        assert!(category.is_all_categories());
    }

    #[test]
    fn test_quiz_category_rejects_non_numeric_id() {
        let result = serde_json::from_str::<QuizCategory>(r#"{"id": "abc", "type": "Art"}"#);
        assert!(result.is_err());
    }
}

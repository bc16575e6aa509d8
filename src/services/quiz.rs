// 随机出题
// 从未出过的题目中等概率抽取一道，可限定分类

use rand::Rng;

use crate::error::StoreError;
use crate::models::{Question, QuizCategory};
use crate::services::database::DatabaseService;

/// 抽题范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(i64),
}

impl QuizScope {
    /// 非 "click" 分类必须带 id
    pub fn from_category(category: &QuizCategory) -> Option<Self> {
        if category.is_all_categories() {
            Some(QuizScope::All)
        } else {
            category.id.map(QuizScope::Category)
        }
    }

    fn category_filter(self) -> Option<i64> {
        match self {
            QuizScope::All => None,
            QuizScope::Category(id) => Some(id),
        }
    }
}

/// 在候选题中等概率选一道，候选为空表示测验结束
pub fn choose_question<R: Rng>(mut pool: Vec<Question>, rng: &mut R) -> Option<Question> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..pool.len());
    Some(pool.swap_remove(index))
}

/// 抽取下一道题
pub fn next_question<R: Rng>(
    db: &DatabaseService,
    scope: QuizScope,
    previous_questions: &[i64],
    rng: &mut R,
) -> Result<Option<Question>, StoreError> {
    let pool = db.list_quiz_candidates(scope.category_filter(), previous_questions)?;
    log::debug!("quiz scope {:?}: {} candidate(s)", scope, pool.len());
    Ok(choose_question(pool, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewQuestion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn seeded_db(categories: &[i64]) -> (DatabaseService, Vec<i64>) {
        let db = DatabaseService::open_in_memory().unwrap();
        let ids = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                db.insert_question(&NewQuestion {
                    question: format!("question {}", i),
                    answer: format!("answer {}", i),
                    difficulty: 1,
                    category: *category,
                })
                .unwrap()
            })
            .collect();
        (db, ids)
    }

    #[test]
    fn test_scope_from_category() {
        let click = QuizCategory { id: None, kind: "click".to_string() };
        assert_eq!(QuizScope::from_category(&click), Some(QuizScope::All));

        let art = QuizCategory { id: Some(2), kind: "Art".to_string() };
        assert_eq!(QuizScope::from_category(&art), Some(QuizScope::Category(2)));

        let missing_id = QuizCategory { id: None, kind: "Art".to_string() };
        assert_eq!(QuizScope::from_category(&missing_id), None);
    }

    #[test]
    fn test_choose_from_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_question(Vec::new(), &mut rng), None);
    }

    #[test]
    fn test_never_null_with_unseen_questions() {
        let (db, ids) = seeded_db(&[1, 1, 2, 3, 4]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let question = next_question(&db, QuizScope::All, &[], &mut rng).unwrap().unwrap();
            assert!(ids.contains(&question.id));
        }
    }

    #[test]
    fn test_never_repeats_previous_questions() {
        let (db, ids) = seeded_db(&[1, 1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut previous = Vec::new();

        while let Some(question) =
            next_question(&db, QuizScope::Category(1), &previous, &mut rng).unwrap()
        {
            assert!(!previous.contains(&question.id));
            previous.push(question.id);
        }

        let seen: HashSet<i64> = previous.into_iter().collect();
        assert_eq!(seen, ids.into_iter().collect());
    }

    #[test]
    fn test_category_exhausted_returns_none() {
        let (db, ids) = seeded_db(&[1, 2, 2]);
        let mut rng = StdRng::seed_from_u64(3);

        let result = next_question(&db, QuizScope::Category(2), &ids[1..], &mut rng).unwrap();
        assert_eq!(result, None);

        // 其他分类仍有题目
        let other = next_question(&db, QuizScope::All, &ids[1..], &mut rng).unwrap();
        assert_eq!(other.map(|q| q.id), Some(ids[0]));
    }

    #[test]
    fn test_draw_covers_whole_pool() {
        let (db, ids) = seeded_db(&[5, 5, 5]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut drawn = HashSet::new();

        for _ in 0..200 {
            let question = next_question(&db, QuizScope::Category(5), &[], &mut rng).unwrap().unwrap();
            drawn.insert(question.id);
        }

        assert_eq!(drawn, ids.into_iter().collect());
    }

    #[test]
    fn test_same_seed_same_draw() {
        let (db, _) = seeded_db(&[1, 1, 1, 1, 1, 1]);

        let first = next_question(&db, QuizScope::All, &[], &mut StdRng::seed_from_u64(99)).unwrap();
        let second = next_question(&db, QuizScope::All, &[], &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }
}

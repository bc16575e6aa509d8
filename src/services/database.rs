// 数据库服务模块
// 提供 SQLite 数据库操作，支持题目与分类的存取

use rusqlite::{Connection, Row};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::models::{Category, NewQuestion, Question};

/// 空库时写入的默认分类
const DEFAULT_CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

const QUESTION_COLUMNS: &str = "id, question, answer, difficulty, category";

/// 数据库服务
///
/// 克隆后共享同一个连接，由进程持有，退出时随最后一个句柄释放
#[derive(Clone)]
pub struct DatabaseService {
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseService {
    /// 打开（必要时创建）数据库文件并初始化表结构
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        // 确保数据目录存在
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        Self::from_connection(conn)
    }

    /// 内存数据库，主要用于测试
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let service = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        service.initialize()?;
        Ok(service)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// 初始化数据库表结构
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        // questions.category 不设外键，分类不存在时查询结果为空
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                difficulty INTEGER NOT NULL CHECK(difficulty BETWEEN 1 AND 5),
                category INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
        ",
        )?;

        Ok(())
    }

    // ==================== 分类 ====================

    /// 分类表为空时写入默认分类，返回写入条数
    pub fn seed_default_categories(&self) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;

        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO categories (type) VALUES (?)")?;
            for kind in DEFAULT_CATEGORIES {
                stmt.execute(rusqlite::params![kind])?;
            }
        }
        tx.commit()?;

        Ok(DEFAULT_CATEGORIES.len())
    }

    /// 添加分类
    pub fn insert_category(&self, kind: &str) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute("INSERT INTO categories (type) VALUES (?)", rusqlite::params![kind])?;
        Ok(conn.last_insert_rowid())
    }

    /// 按类型名升序列出全部分类
    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT id, type FROM categories ORDER BY type, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                kind: row.get(1)?,
            })
        })?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }

        Ok(categories)
    }

    // ==================== 题目 ====================

    /// 列出全部题目（按存储顺序）
    pub fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 获取某分类下的题目，分类 id 不做存在性校验
    pub fn list_questions_by_category(&self, category: i64) -> Result<Vec<Question>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions WHERE category = ? ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![category], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 搜索题目（题干包含关键字，不区分大小写）
    ///
    /// SQLite 的 LIKE 只折叠 ASCII 大小写，这里取出题干后按 Unicode 小写比较。
    /// 空关键字由调用方拦截，这里不会收到
    pub fn search_questions(&self, term: &str) -> Result<Vec<Question>, StoreError> {
        let needle = term.to_lowercase();
        let questions = self.list_questions()?;

        Ok(questions
            .into_iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .collect())
    }

    /// 测验候选题：排除已出过的题目，可选按分类过滤
    ///
    /// 已出题目以一个 JSON 数组参数绑定，不受 SQLite 变量个数限制
    pub fn list_quiz_candidates(
        &self,
        category: Option<i64>,
        exclude: &[i64],
    ) -> Result<Vec<Question>, StoreError> {
        let excluded = serde_json::to_string(exclude)?;
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions
             WHERE (?1 IS NULL OR category = ?1)
               AND id NOT IN (SELECT value FROM json_each(?2))
             ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![category, excluded], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 添加题目，返回新 id
    pub fn insert_question(&self, question: &NewQuestion) -> Result<i64, StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO questions (question, answer, difficulty, category)
             VALUES (?, ?, ?, ?)",
            rusqlite::params![
                question.question,
                question.answer,
                question.difficulty,
                question.category,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 删除题目
    pub fn delete_question(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let affected = conn.execute("DELETE FROM questions WHERE id = ?", rusqlite::params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    // ==================== 辅助方法 ====================

    /// 从数据库行转换为 Question
    fn row_to_question(row: &Row) -> Result<Question, rusqlite::Error> {
        Ok(Question {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            difficulty: row.get(3)?,
            category: row.get(4)?,
        })
    }
}

// 服务模块
// 提供核心业务逻辑服务

pub mod database;
pub mod pagination;
pub mod quiz;

pub use database::DatabaseService;

pub use pagination::{paginate, parse_page, QUESTIONS_PER_PAGE};

pub use quiz::{choose_question, next_question, QuizScope};

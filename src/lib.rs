// 题库问答服务
// 题目与分类的增删查、分页、搜索以及随机出题

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use commands::{build_router, AppState};
pub use error::{ApiError, StoreError};
pub use services::DatabaseService;
pub use utils::AppConfig;

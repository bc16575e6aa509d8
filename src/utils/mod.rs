// 工具模块
// 运行配置与日志初始化

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DB_PATH: &str = "data/trivia.db";

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub log_level: LevelFilter,
    pub seed_categories: bool,
}

impl AppConfig {
    /// 从环境变量读取配置，存在 `.env` 时先加载
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("TRIVIA_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("TRIVIA_BIND_ADDR must be a socket address such as 127.0.0.1:5000")?;

        let database_path = lookup("TRIVIA_DATABASE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let log_level = match lookup("TRIVIA_LOG_LEVEL") {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("TRIVIA_LOG_LEVEL has unknown level {:?}", level))?,
            None => LevelFilter::Info,
        };

        let seed_categories = match lookup("TRIVIA_SEED_CATEGORIES") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| anyhow!("TRIVIA_SEED_CATEGORIES must be true or false, got {:?}", flag))?,
            None => true,
        };

        Ok(Self {
            bind_addr,
            database_path,
            log_level,
            seed_categories,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 初始化日志输出到标准输出
pub fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.database_path, PathBuf::from("data/trivia.db"));
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.seed_categories);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TRIVIA_BIND_ADDR", "0.0.0.0:8080"),
            ("TRIVIA_DATABASE_PATH", "/tmp/quiz.db"),
            ("TRIVIA_LOG_LEVEL", "debug"),
            ("TRIVIA_SEED_CATEGORIES", "off"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/quiz.db"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(!config.seed_categories);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("TRIVIA_BIND_ADDR", "localhost")]).is_err());
        assert!(config_from(&[("TRIVIA_LOG_LEVEL", "loud")]).is_err());
        assert!(config_from(&[("TRIVIA_SEED_CATEGORIES", "maybe")]).is_err());
    }
}

use anyhow::Context;
use trivia_api::utils::{init_logging, AppConfig};
use trivia_api::{build_router, AppState, DatabaseService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_level).context("failed to initialize logging")?;

    // 初始化数据库
    let db = DatabaseService::open(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;
    if config.seed_categories {
        let seeded = db.seed_default_categories().context("failed to seed categories")?;
        if seeded > 0 {
            log::info!("seeded {} default categories", seeded);
        }
    }

    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!(
        "trivia api listening on {} (database {})",
        config.bind_addr,
        config.database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // 路由随 serve 结束被释放，数据库连接一并关闭
    log::info!("trivia api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}

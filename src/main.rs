use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use infra::config::AppConfigImpl;
use log::info;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use server::middleware::other;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}";

fn init_logging() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build("app.log")
        .context("failed to open app.log")?;

    // 同时输出到控制台和文件
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build(
            "stdout",
            Box::new(
                ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                    .build(),
            ),
        ))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )
        .context("invalid log4rs configuration")?;

    log4rs::init_config(config).context("failed to install logger")?;
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cfg = AppConfigImpl::load().map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
    anyhow::ensure!(
        !cfg.database_url().is_empty(),
        "database_url is not configured (set APP__DATABASE_URL or config.toml)"
    );
    let server_cfg = cfg.server();
    let db = server::AppState::init_db(&cfg)
        .await
        .context("failed to connect to database")?;

    let app_state = server::AppState::new(db, cfg).context("failed to build application state")?;
    server::init_admin_user(&app_state)
        .await
        .context("failed to bootstrap admin user")?;
    let app_state = web::Data::new(app_state);

    info!("listening on {}:{}", server_cfg.host, server_cfg.port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(server::configure_service)
            .wrap(other::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await?;
    Ok(())
}

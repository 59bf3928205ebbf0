use env_logger::Env;
use sea_orm_migration::prelude::*;

/// 读取 DATABASE_URL，支持 up / down / fresh / status 等子命令
#[async_std::main]
async fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::debug!("cinetrack schema migrator starting");
    cli::run_cli(migration::Migrator).await;
}

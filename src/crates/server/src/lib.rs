pub mod api;
pub mod error;
pub mod middleware;

use application::auth::{AuthService, PasswordHasher, TokenService};
use application::command::comment::CommentAppService;
use application::command::interaction::InteractionAppService;
use application::command::media::MediaAppService;
use application::command::user::UserAppService;
use application::error::AppError;
use application::query::get_comments::GetComments;
use application::query::get_interactions::GetInteractions;
use application::query::get_media::GetMedia;
use application::query::get_users::GetUsers;
use application::shared::MetadataProvider;
use domain::user::UserRepository;
use infra::auth::{AuthConfig, BcryptPasswordHasher, JwtTokenService};
use infra::config::AppConfigImpl;
use infra::repository::postgres::command::{
    CommentRepositoryImpl, InteractionRepositoryImpl, MediaRepositoryImpl, UserRepositoryImpl,
};
use infra::repository::postgres::query::{
    CommentDaoImpl, InteractionDaoImpl, MediaDaoImpl, UserDaoImpl,
};
use infra::OmdbClient;
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement};
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub db: DatabaseConnection,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub async fn init_db(app_cfg: &AppConfigImpl) -> Result<DatabaseConnection, DbErr> {
        let pool = app_cfg.database();
        let mut opt = ConnectOptions::new(app_cfg.database_url());
        opt.max_connections(pool.max_connections)
            .min_connections(pool.min_connections)
            .connect_timeout(Duration::from_secs(3))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .max_lifetime(Duration::from_secs(300))
            .sqlx_logging(false)
            .sqlx_logging_level(log::LevelFilter::Info);

        let db = Database::connect(opt).await?;

        let backend = DbBackend::Postgres;
        db.execute(Statement::from_string(backend, "SELECT 1".to_owned()))
            .await?;

        info!("Database connection pool initialized successfully");
        Ok(db)
    }

    pub fn new(db: DatabaseConnection, app_cfg: AppConfigImpl) -> Result<Self, AppError> {
        let metadata: Arc<dyn MetadataProvider> = Arc::new(OmdbClient::new(&app_cfg.omdb())?);
        Ok(Self::with_provider(db, app_cfg, metadata))
    }

    pub fn with_provider(
        db: DatabaseConnection,
        app_cfg: AppConfigImpl,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            app_cfg,
            db,
            metadata,
        }
    }

    pub fn token_service(&self) -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(
            self.app_cfg.jwt_secret(),
            self.app_cfg.jwt_expire_secs(),
        ))
    }

    pub fn password_hasher(&self) -> Arc<dyn PasswordHasher> {
        Arc::new(BcryptPasswordHasher::new(self.app_cfg.salt_cost()))
    }

    fn user_repo(&self) -> Arc<dyn UserRepository> {
        Arc::new(UserRepositoryImpl::new(self.db.clone()))
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.user_repo(), self.password_hasher(), self.token_service())
    }

    pub fn user_service(&self) -> UserAppService {
        UserAppService::new(self.user_repo(), self.password_hasher())
    }

    pub fn media_service(&self) -> MediaAppService {
        MediaAppService::new(
            Arc::new(MediaRepositoryImpl::new(self.db.clone())),
            self.metadata.clone(),
        )
    }

    pub fn interaction_service(&self) -> InteractionAppService {
        InteractionAppService::new(
            Arc::new(InteractionRepositoryImpl::new(self.db.clone())),
            Arc::new(MediaRepositoryImpl::new(self.db.clone())),
        )
    }

    pub fn comment_service(&self) -> CommentAppService {
        CommentAppService::new(
            Arc::new(CommentRepositoryImpl::new(self.db.clone())),
            Arc::new(MediaRepositoryImpl::new(self.db.clone())),
        )
    }

    pub fn get_users(&self) -> GetUsers {
        GetUsers::new(Arc::new(UserDaoImpl::new(self.db.clone())))
    }

    pub fn get_media(&self) -> GetMedia {
        GetMedia::new(Arc::new(MediaDaoImpl::new(self.db.clone())))
    }

    pub fn get_interactions(&self) -> GetInteractions {
        GetInteractions::new(
            Arc::new(InteractionDaoImpl::new(self.db.clone())),
            Arc::new(UserDaoImpl::new(self.db.clone())),
            Arc::new(MediaDaoImpl::new(self.db.clone())),
        )
    }

    pub fn get_comments(&self) -> GetComments {
        GetComments::new(
            Arc::new(CommentDaoImpl::new(self.db.clone())),
            Arc::new(UserDaoImpl::new(self.db.clone())),
            Arc::new(MediaDaoImpl::new(self.db.clone())),
        )
    }
}

/// 用户表为空时创建管理员账号，随机密码只在日志中出现一次
pub async fn init_admin_user(state: &AppState) -> Result<(), AppError> {
    use rand::Rng;

    if state.user_repo().count().await? > 0 {
        info!("Users already exist, skipping admin creation");
        return Ok(());
    }

    let password: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();

    let admin_cfg = state.app_cfg.admin();
    let admin = state
        .auth_service()
        .create_admin(&admin_cfg.username, &admin_cfg.email, &password)
        .await?;

    info!("===========================================");
    info!("  Admin user created successfully!");
    info!("  Username: {}", admin.username);
    info!("  Password: {}", password);
    info!("  Please change the password after login!");
    info!("===========================================");
    Ok(())
}

/// 注册全部 REST 路由以及统一的提取器错误处理
pub fn configure_service(svc: &mut actix_web::web::ServiceConfig) {
    svc.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .configure(api::user::configure_service)
        .configure(api::media::configure_service)
        .configure(api::interaction::configure_service)
        .configure(api::comment::configure_service);
}

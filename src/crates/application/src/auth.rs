use std::sync::Arc;

use crate::error::AppError;
use domain::user::{User, UserRepository};
use domain::value::UserId;
use log::{info, warn};

const INVALID_LOGIN: &str = "Username or password is invalid";

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, AppError>;
    fn verify(&self, pwd: &str, hashed_pwd: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserClaims {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for UserClaims {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

pub trait TokenService: Send + Sync {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError>;
    fn verify(&self, token: &str) -> Result<UserClaims, AppError>;
}

/// 登录成功后的会话
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    token_svc: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        token_svc: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            token_svc,
        }
    }

    /// Login with username or email, returns the user and a fresh token
    pub async fn login(&self, login: &str, pwd: &str) -> Result<Session, AppError> {
        let user = self
            .user_repo
            .find_by_login(login.trim())
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_LOGIN.to_string()))?;
        if self.hasher.verify(pwd, &user.password).is_err() {
            warn!("failed login attempt for {}", login);
            return Err(AppError::AuthError(INVALID_LOGIN.to_string()));
        }
        let token = self.token_svc.issue(&UserClaims::from(&user))?;
        Ok(Session { user, token })
    }

    /// Create admin user if no users exist
    pub async fn create_admin(
        &self,
        username: &str,
        email: &str,
        pwd: &str,
    ) -> Result<User, AppError> {
        if self.user_repo.count().await? > 0 {
            return Err(AppError::AuthError("can not create another admin".to_string()));
        }
        let hashed_pwd = self.hasher.hash(pwd)?;
        let mut admin = User::new(username, email, &hashed_pwd, None, true);
        self.user_repo.save(&mut admin).await?;
        info!("admin user {} created with id {}", admin.username, admin.id);
        Ok(admin)
    }
}

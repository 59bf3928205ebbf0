use crate::auth::PasswordHasher;
use crate::error::AppError;
use domain::user::{
    validate_email, validate_password, validate_username, FieldErrors, User, UserError,
    UserRepository,
};
use domain::value::UserId;
use log::{info, warn};
use std::sync::Arc;

/// 注册命令（密码为明文，由服务负责哈希）
pub struct RegisterUserCmd {
    pub username: String,
    pub email: String,
    pub password: String,
    pub location: Option<String>,
}

/// 更新个人资料命令，None 表示不修改
pub struct UpdateProfileCmd {
    pub user_id: UserId,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
}

/// 删除用户命令
pub struct DeleteUserCmd {
    pub target: UserId,
}

/// 用户应用服务
pub struct UserAppService {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserAppService {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn register(&self, cmd: RegisterUserCmd) -> Result<User, AppError> {
        let mut errors = FieldErrors::new();
        errors.extend("username", validate_username(&cmd.username));
        errors.extend("email", validate_email(&cmd.email));
        errors.extend("password", validate_password(&cmd.password));
        errors.into_result()?;

        self.ensure_available(&cmd.username, &cmd.email, None).await?;

        let hashed = self.hasher.hash(&cmd.password)?;
        let mut user = User::new(
            &cmd.username,
            &cmd.email,
            &hashed,
            cmd.location.as_deref(),
            false,
        );
        self.user_repo.save(&mut user).await?;
        info!("user {} registered with id {}", user.username, user.id);
        Ok(user)
    }

    pub async fn update_profile(&self, cmd: UpdateProfileCmd) -> Result<User, AppError> {
        let mut user = self
            .user_repo
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User could not be found.".to_string()))?;

        let mut errors = FieldErrors::new();
        if let Some(username) = &cmd.username {
            errors.extend("username", validate_username(username));
        }
        if let Some(email) = &cmd.email {
            errors.extend("email", validate_email(email));
        }
        if let Some(password) = &cmd.password {
            errors.extend("password", validate_password(password));
        }
        errors.into_result()?;

        let username = cmd.username.as_deref().filter(|u| *u != user.username);
        let email = cmd.email.as_deref().filter(|e| e.trim() != user.email);
        self.ensure_available(username.unwrap_or(""), email.unwrap_or(""), Some(user.id))
            .await?;

        if let Some(password) = &cmd.password {
            let hashed = self.hasher.hash(password)?;
            user.change_password(&hashed);
        }
        user.update_profile(username, email, cmd.location.as_deref());

        self.user_repo.save(&mut user).await?;
        info!("user {} updated", user.id);
        Ok(user)
    }

    /// 删除用户：仅本人或管理员可操作。
    /// 权限先于存在性判断：非管理员删除他人时总是 403。
    pub async fn delete_user(&self, actor: &User, cmd: DeleteUserCmd) -> Result<User, AppError> {
        if !actor.may_manage(cmd.target) {
            warn!("{} tried to delete user {}", actor.username, cmd.target);
            return Err(AppError::Forbidden(
                "Not authorised to delete this user.".to_string(),
            ));
        }

        let target = self
            .user_repo
            .find_by_id(cmd.target)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Unable to find user with id {}.", cmd.target))
            })?;

        self.user_repo.delete(target.id).await?;
        info!("user {} deleted by {}", target.username, actor.username);
        Ok(target)
    }

    /// 空字符串表示不检查该字段
    async fn ensure_available(
        &self,
        username: &str,
        email: &str,
        owner: Option<UserId>,
    ) -> Result<(), AppError> {
        let taken_by_other = |user: &User| owner.map_or(true, |id| user.id != id);
        if !username.is_empty() {
            if let Some(existing) = self.user_repo.find_by_username(username).await? {
                if taken_by_other(&existing) {
                    return Err(UserError::UsernameTaken.into());
                }
            }
        }
        if !email.is_empty() {
            if let Some(existing) = self.user_repo.find_by_email(email.trim()).await? {
                if taken_by_other(&existing) {
                    return Err(UserError::EmailTaken.into());
                }
            }
        }
        Ok(())
    }
}

use domain::user::User;
use serde::{Deserialize, Serialize};

/// 公开的用户信息（不含邮箱与密码）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub location: Option<String>,
}

/// 注册成功后返回给本人的用户信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub location: Option<String>,
    pub is_admin: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id.as_i64(),
            username: user.username.clone(),
            location: user.location.clone(),
        }
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.as_i64(),
            username: user.username.clone(),
            email: user.email.clone(),
            location: user.location.clone(),
            is_admin: user.is_admin,
        }
    }
}

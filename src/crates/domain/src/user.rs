use super::value::UserId;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

const MIN_CREDENTIAL_LEN: usize = 5;
const MAX_USERNAME_LEN: usize = 20;

static CREDENTIAL_CHARSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]+$").unwrap());

/// 字段校验错误，按字段名排序收集所有错误信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn extend(&mut self, field: &str, messages: Vec<String>) {
        for message in messages {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), UserError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(UserError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// 用户领域错误
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Username or password is invalid")]
    InvalidUserOrPassword,
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("That username is already taken. Please choose another one.")]
    UsernameTaken,
    #[error("That email is already registered. Please use a different email.")]
    EmailTaken,
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{0}")]
    DbErr(String),
}

pub fn validate_username(username: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let len = username.chars().count();
    if len < MIN_CREDENTIAL_LEN {
        messages.push("Username must be at least 5 characters.".to_string());
    }
    if len > MAX_USERNAME_LEN {
        messages.push("Username must be at most 20 characters.".to_string());
    }
    if !CREDENTIAL_CHARSET.is_match(username) {
        messages.push("Username must be unspaced with valid characters.".to_string());
    }
    messages
}

pub fn validate_password(password: &str) -> Vec<String> {
    let mut messages = Vec::new();
    if password.chars().count() < MIN_CREDENTIAL_LEN {
        messages.push("Password must be at least 5 characters.".to_string());
    }
    if !CREDENTIAL_CHARSET.is_match(password) {
        messages.push("Password must be unspaced with valid characters.".to_string());
    }
    messages
}

pub fn validate_email(email: &str) -> Vec<String> {
    let email = email.trim();
    if email.is_empty() {
        return vec!["Email is required.".to_string()];
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Vec::new(),
        _ => vec!["Not a valid email address.".to_string()],
    }
}

/// 用户聚合根
///
/// 代表一个注册用户。密码字段保存 bcrypt 哈希，明文从不落库。
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String, // bcrypt hash
    pub location: Option<String>,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn new(
        username: &str,
        email: &str,
        hashed_password: &str,
        location: Option<&str>,
        is_admin: bool,
    ) -> Self {
        let now = Utc::now().naive_utc();
        User {
            id: UserId::default(),
            username: username.to_string(),
            email: email.trim().to_string(),
            password: hashed_password.to_string(),
            location: location.map(str::to_string),
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn change_password(&mut self, new_hashed_password: &str) -> &mut Self {
        self.password = new_hashed_password.to_string();
        self.touch()
    }

    /// 部分更新：None 表示保持原值
    pub fn update_profile(
        &mut self,
        username: Option<&str>,
        email: Option<&str>,
        location: Option<&str>,
    ) -> &mut Self {
        if let Some(username) = username {
            self.username = username.to_string();
        }
        if let Some(email) = email {
            self.email = email.trim().to_string();
        }
        if let Some(location) = location {
            self.location = Some(location.to_string());
        }
        self.touch()
    }

    /// Self-or-admin rule used by every owner-scoped delete.
    pub fn may_manage(&self, owner: UserId) -> bool {
        self.is_admin || self.id == owner
    }

    fn touch(&mut self) -> &mut Self {
        self.updated_at = Utc::now().naive_utc();
        self
    }
}

/// 用户仓储接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 获取用户总数
    async fn count(&self) -> Result<u64, UserError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// 用户名或邮箱登录
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError>;

    /// 保存用户（id 为 0 时插入并回填 id，否则更新）
    async fn save(&self, user: &mut User) -> Result<(), UserError>;

    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_username_reports_length() {
        let messages = validate_username("abc");
        assert_eq!(messages, vec!["Username must be at least 5 characters."]);
    }

    #[test]
    fn spaced_username_reports_charset() {
        let messages = validate_username("john doe");
        assert_eq!(
            messages,
            vec!["Username must be unspaced with valid characters."]
        );
    }

    #[test]
    fn password_collects_all_failures() {
        let messages = validate_password("a b");
        assert_eq!(messages.len(), 2);
        assert!(validate_password("s3cret.pw").is_empty());
    }

    #[test]
    fn email_needs_local_and_domain_part() {
        assert!(validate_email("alice@example.com").is_empty());
        assert!(!validate_email("alice").is_empty());
        assert!(!validate_email("@example.com").is_empty());
        assert_eq!(validate_email("  "), vec!["Email is required."]);
    }

    #[test]
    fn field_errors_into_result() {
        let mut errors = FieldErrors::new();
        assert!(errors.clone().into_result().is_ok());
        errors.add("username", "bad");
        errors.add("username", "worse");
        assert_eq!(errors.get("username").map(Vec::len), Some(2));
        assert!(matches!(errors.into_result(), Err(UserError::Validation(_))));
    }

    #[test]
    fn may_manage_self_or_admin() {
        let mut alice = User::new("alice", "a@x.io", "hash", None, false);
        alice.id = UserId::from(1);
        let mut admin = User::new("admin", "root@x.io", "hash", None, true);
        admin.id = UserId::from(2);

        assert!(alice.may_manage(UserId::from(1)));
        assert!(!alice.may_manage(UserId::from(2)));
        assert!(admin.may_manage(UserId::from(1)));
    }

    #[test]
    fn update_profile_keeps_missing_fields() {
        let mut user = User::new("alice", "a@x.io", "hash", Some("Paris"), false);
        user.update_profile(None, Some("b@x.io"), None);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "b@x.io");
        assert_eq!(user.location.as_deref(), Some("Paris"));
    }
}

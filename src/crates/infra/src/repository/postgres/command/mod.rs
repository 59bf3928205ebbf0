pub mod comment;
pub mod db_data;
pub mod interaction;
pub mod media;
pub mod user;

pub use comment::CommentRepositoryImpl;
pub use interaction::InteractionRepositoryImpl;
pub use media::MediaRepositoryImpl;
pub use user::UserRepositoryImpl;

use sea_orm::{DbErr, SqlErr};

/// 唯一约束冲突时返回违反约束的描述
pub(crate) fn unique_violation(e: &DbErr) -> Option<String> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
        _ => None,
    }
}

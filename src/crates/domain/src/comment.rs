use crate::value::{CommentId, MediaId, UserId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("Content is required.")]
    EmptyContent,
    #[error("Reply must belong to the same media as its parent.")]
    ParentMediaMismatch,
    #[error("Comment not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    DbErr(String),
}

/// 评论聚合
///
/// parent_id 为空的评论是顶层评论，否则是对另一条评论的回复。
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created: NaiveDateTime,
    pub parent_id: Option<CommentId>,
    pub user_id: UserId,
    pub media_id: MediaId,
}

impl Comment {
    pub fn new(
        user_id: UserId,
        media_id: MediaId,
        content: &str,
        parent: Option<&Comment>,
    ) -> Result<Self, CommentError> {
        let content = Self::checked_content(content)?;
        if let Some(parent) = parent {
            if parent.media_id != media_id {
                return Err(CommentError::ParentMediaMismatch);
            }
        }
        Ok(Comment {
            id: CommentId::default(),
            content,
            created: Utc::now().naive_utc(),
            parent_id: parent.map(|p| p.id),
            user_id,
            media_id,
        })
    }

    pub fn edit(&mut self, content: &str) -> Result<&mut Self, CommentError> {
        self.content = Self::checked_content(content)?;
        Ok(self)
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    fn checked_content(content: &str) -> Result<String, CommentError> {
        if content.trim().is_empty() {
            return Err(CommentError::EmptyContent);
        }
        Ok(content.to_string())
    }
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentError>;

    async fn save(&self, comment: &mut Comment) -> Result<(), CommentError>;

    /// 删除评论；其回复的 parent_id 置空
    async fn delete(&self, id: CommentId) -> Result<(), CommentError>;
}

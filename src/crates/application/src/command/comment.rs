use crate::error::AppError;
use domain::comment::{Comment, CommentRepository};
use domain::media::{Category, MediaRepository};
use domain::user::User;
use domain::value::CommentId;
use log::{info, warn};
use std::sync::Arc;

pub struct CreateCommentCmd {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub parent_id: Option<i64>,
}

pub struct UpdateCommentCmd {
    pub id: CommentId,
    pub content: Option<String>,
}

pub struct CommentAppService {
    comment_repo: Arc<dyn CommentRepository>,
    media_repo: Arc<dyn MediaRepository>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl CommentAppService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        media_repo: Arc<dyn MediaRepository>,
    ) -> Self {
        Self {
            comment_repo,
            media_repo,
        }
    }

    pub async fn create(&self, author: &User, cmd: CreateCommentCmd) -> Result<Comment, AppError> {
        // 内容按原样保存，只在去除首尾空白后判空
        let content = cmd.content.as_deref().filter(|c| !c.trim().is_empty());
        let (Some(title), Some(category), Some(content)) = (
            non_blank(&cmd.title),
            non_blank(&cmd.category),
            content,
        ) else {
            return Err(AppError::InvalidInput(
                "title, category, and content are required.".to_string(),
            ));
        };
        let category: Category = category.parse().map_err(|_| {
            AppError::Unprocessable(
                "Category value must be either 'movie' or 'series'.".to_string(),
            )
        })?;

        let media = self
            .media_repo
            .find_by_title(title, category)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found.".to_string()))?;

        let parent = match cmd.parent_id {
            Some(parent_id) => Some(
                self.comment_repo
                    .find_by_id(CommentId::from(parent_id))
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Parent comment {} not found.", parent_id))
                    })?,
            ),
            None => None,
        };

        let mut comment = Comment::new(author.id, media.id, content, parent.as_ref())?;
        self.comment_repo.save(&mut comment).await?;
        info!(
            "comment {} posted by {} on '{}'",
            comment.id, author.username, media.title
        );
        Ok(comment)
    }

    /// 仅作者本人可以修改评论
    pub async fn update(&self, author: &User, cmd: UpdateCommentCmd) -> Result<Comment, AppError> {
        let mut comment = self
            .comment_repo
            .find_by_id(cmd.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

        if !comment.is_authored_by(author.id) {
            return Err(AppError::Forbidden(
                "You are not authorised to update this comment.".to_string(),
            ));
        }

        comment.edit(cmd.content.as_deref().unwrap_or_default())?;
        self.comment_repo.save(&mut comment).await?;
        Ok(comment)
    }

    /// 作者或管理员可删除；非管理员找不到自己的评论时一律 403
    pub async fn delete(&self, actor: &User, id: CommentId) -> Result<(), AppError> {
        let found = self
            .comment_repo
            .find_by_id(id)
            .await?
            .filter(|c| actor.may_manage(c.user_id));

        let Some(comment) = found else {
            if actor.is_admin {
                return Err(AppError::NotFound(format!(
                    "Cannot find comment with id {}.",
                    id
                )));
            }
            warn!("{} tried to delete comment {}", actor.username, id);
            return Err(AppError::Forbidden(
                "Not authorised to delete this comment.".to_string(),
            ));
        };
        self.comment_repo.delete(comment.id).await?;
        info!("comment {} deleted by {}", id, actor.username);
        Ok(())
    }
}

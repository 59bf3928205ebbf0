use crate::query::dao::{CommentDao, MediaDao, UserDao};
use crate::query::QueryError;
use model::comment::{CommentNode, CommentRow, CommentView};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// 将按 id 排序的扁平评论行组装成评论树。
///
/// 只有 parent_id 为空的行作为根；父评论不在结果集中的回复不会输出。
pub fn build_comment_tree(rows: Vec<CommentRow>) -> Vec<CommentNode> {
    let mut children: HashMap<i64, Vec<&CommentRow>> = HashMap::new();
    let mut roots = Vec::new();
    for row in &rows {
        match row.parent_id {
            Some(parent) => children.entry(parent).or_default().push(row),
            None => roots.push(row),
        }
    }

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|row| attach(row, &children, &mut visited))
        .collect()
}

fn attach(
    row: &CommentRow,
    children: &HashMap<i64, Vec<&CommentRow>>,
    visited: &mut HashSet<i64>,
) -> Option<CommentNode> {
    if !visited.insert(row.id) {
        return None;
    }
    let mut node = CommentNode::leaf(row);
    if let Some(replies) = children.get(&row.id) {
        node.children = replies
            .iter()
            .filter_map(|reply| attach(reply, children, visited))
            .collect();
    }
    Some(node)
}

/// 评论查询服务
#[derive(Clone)]
pub struct GetComments {
    comment_dao: Arc<dyn CommentDao + Send + Sync>,
    user_dao: Arc<dyn UserDao + Send + Sync>,
    media_dao: Arc<dyn MediaDao + Send + Sync>,
}

impl GetComments {
    pub fn new(
        comment_dao: Arc<dyn CommentDao + Send + Sync>,
        user_dao: Arc<dyn UserDao + Send + Sync>,
        media_dao: Arc<dyn MediaDao + Send + Sync>,
    ) -> Self {
        Self {
            comment_dao,
            user_dao,
            media_dao,
        }
    }

    /// 按用户名和/或标题过滤后的评论树
    pub async fn list(
        &self,
        username: Option<&str>,
        title: Option<&str>,
    ) -> Result<Vec<CommentNode>, QueryError> {
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        let user_id = match username {
            Some(username) => Some(
                self.user_dao
                    .get_id_by_username(username)
                    .await?
                    .ok_or_else(|| {
                        QueryError::NotFound(format!("Username {} not found.", username))
                    })?,
            ),
            None => None,
        };
        let media_id = match title {
            Some(title) => Some(
                self.media_dao
                    .get_brief_by_title(title)
                    .await?
                    .ok_or_else(|| QueryError::NotFound(format!("Title {} not found.", title)))?
                    .id,
            ),
            None => None,
        };

        let rows = self.comment_dao.get_rows(user_id, media_id).await?;
        if rows.is_empty() {
            if let Some(username) = username {
                return Err(QueryError::NotFound(format!(
                    "No comments found from user {}.",
                    username
                )));
            }
            if let Some(title) = title {
                return Err(QueryError::NotFound(format!(
                    "No comments found for {}.",
                    title
                )));
            }
        }
        Ok(build_comment_tree(rows))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CommentView>, QueryError> {
        Ok(self
            .comment_dao
            .get_row(id)
            .await?
            .map(|row| CommentView::from(&row)))
    }
}

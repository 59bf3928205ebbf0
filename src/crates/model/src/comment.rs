use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const CREATED_FORMAT: &str = "%Y-%m-%d T%H:%M";

pub fn format_created(created: &NaiveDateTime) -> String {
    created.format(CREATED_FORMAT).to_string()
}

/// 评论表的一行，已关联作者与媒体
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub created: NaiveDateTime,
    pub parent_id: Option<i64>,
    pub username: String,
    pub media_title: String,
    pub media_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentMedia {
    pub title: String,
    pub category: String,
}

/// 评论树节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: i64,
    pub content: String,
    pub created: String,
    pub user: CommentAuthor,
    pub media: CommentMedia,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn leaf(row: &CommentRow) -> Self {
        CommentNode {
            id: row.id,
            content: row.content.clone(),
            created: format_created(&row.created),
            user: CommentAuthor {
                username: row.username.clone(),
            },
            media: CommentMedia {
                title: row.media_title.clone(),
                category: row.media_category.clone(),
            },
            children: Vec::new(),
        }
    }
}

/// 单条评论（创建/更新接口的返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub media: CommentMedia,
    pub user: CommentAuthor,
    pub content: String,
    pub created: String,
    pub parent_id: Option<i64>,
}

impl From<&CommentRow> for CommentView {
    fn from(row: &CommentRow) -> Self {
        CommentView {
            id: row.id,
            media: CommentMedia {
                title: row.media_title.clone(),
                category: row.media_category.clone(),
            },
            user: CommentAuthor {
                username: row.username.clone(),
            },
            content: row.content.clone(),
            created: format_created(&row.created),
            parent_id: row.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn created_uses_spaced_t_separator() {
        let created = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 59)
            .unwrap();
        assert_eq!(format_created(&created), "2024-03-09 T07:05");
    }
}

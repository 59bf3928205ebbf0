use crate::value::MediaId;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media must be either movie or series if specified.")]
    InvalidCategory(String),
    #[error("Media with id {0} not found")]
    NotFound(String),
    #[error("{0}")]
    DbErr(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Movie,
    Series,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Series => "series",
        }
    }

    /// 面向用户的描述，用于类型不匹配提示
    pub fn describe(&self) -> &'static str {
        match self {
            Category::Movie => "a movie",
            Category::Series => "a TV series",
        }
    }
}

impl FromStr for Category {
    type Err = MediaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Category::Movie),
            "series" => Ok(Category::Series),
            _ => Err(MediaError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 媒体聚合根（电影或剧集）
///
/// 元数据来自第三方提供方，除 title 与 category 外均可为空。
/// ratings 原样保存提供方返回的评分数组，例如
/// `[{"Source": "Internet Movie Database", "Value": "8.8/10"}]`。
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub id: MediaId,
    pub title: String,
    pub year: Option<String>,
    pub category: Category,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub ratings: Option<Value>,
    pub metascore: Option<String>,
    pub box_office: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Media {
    pub fn new(title: &str, category: Category) -> Self {
        Media {
            id: MediaId::default(),
            title: title.to_string(),
            year: None,
            category,
            genre: None,
            director: None,
            writer: None,
            actors: None,
            plot: None,
            country: None,
            ratings: None,
            metascore: None,
            box_office: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// 标题比较不区分大小写
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.trim().to_lowercase()
    }
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, MediaError>;

    /// 按标题（不区分大小写）和类别精确查找
    async fn find_by_title(
        &self,
        title: &str,
        category: Category,
    ) -> Result<Option<Media>, MediaError>;

    async fn save(&self, media: &mut Media) -> Result<(), MediaError>;

    async fn delete(&self, id: MediaId) -> Result<(), MediaError>;
}

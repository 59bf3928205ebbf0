use crate::value::{InteractionId, MediaId, UserId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 10;

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Invalid value for watched or watchlist, must be either yes or no.")]
    InvalidFlag(String),
    #[error("Rating can only be whole numbers from 0 to 10.")]
    InvalidRating(i64),
    #[error("Interaction already exists. Use PUT or PATCH to update.")]
    AlreadyExists,
    #[error("Interaction id {0} not found.")]
    NotFound(String),
    #[error("{0}")]
    DbErr(String),
}

/// yes/no 状态位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flag {
    Yes,
    #[default]
    No,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Yes => "yes",
            Flag::No => "no",
        }
    }

    pub fn is_yes(&self) -> bool {
        *self == Flag::Yes
    }
}

impl FromStr for Flag {
    type Err = InteractionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Flag::Yes),
            "no" => Ok(Flag::No),
            _ => Err(InteractionError::InvalidFlag(s.to_string())),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 0 到 10 的整数评分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i64) -> Result<Self, InteractionError> {
        if (MIN_RATING as i64..=MAX_RATING as i64).contains(&value) {
            Ok(Rating(value as i32))
        } else {
            Err(InteractionError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// 对一条交互记录的局部修改，缺省字段保持原值。
/// rating 为 `Some(None)` 时清除已有评分。
#[derive(Debug, Clone, Default)]
pub struct InteractionPatch {
    pub watched: Option<Flag>,
    pub rating: Option<Option<Rating>>,
    pub watchlist: Option<Flag>,
}

/// 用户与媒体之间的交互聚合
///
/// 每个 (user, media) 组合至多一条记录。
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: InteractionId,
    pub user_id: UserId,
    pub media_id: MediaId,
    pub watched: Flag,
    pub rating: Option<Rating>,
    pub watchlist: Flag,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Interaction {
    pub fn new(user_id: UserId, media_id: MediaId, patch: InteractionPatch) -> Self {
        let now = Utc::now().naive_utc();
        let mut interaction = Interaction {
            id: InteractionId::default(),
            user_id,
            media_id,
            watched: Flag::No,
            rating: None,
            watchlist: Flag::No,
            created_at: now,
            updated_at: now,
        };
        interaction.apply(patch);
        interaction
    }

    pub fn apply(&mut self, patch: InteractionPatch) -> &mut Self {
        if let Some(watched) = patch.watched {
            self.watched = watched;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(watchlist) = patch.watchlist {
            self.watchlist = watchlist;
        }
        self.updated_at = Utc::now().naive_utc();
        self
    }
}

#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn find_by_id(&self, id: InteractionId) -> Result<Option<Interaction>, InteractionError>;

    async fn find_by_user_and_media(
        &self,
        user_id: UserId,
        media_id: MediaId,
    ) -> Result<Option<Interaction>, InteractionError>;

    async fn save(&self, interaction: &mut Interaction) -> Result<(), InteractionError>;

    async fn delete(&self, id: InteractionId) -> Result<(), InteractionError>;
}

use crate::ModelError;
use domain::media::Media;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// 媒体列表的投影方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
    Title,
    Plot,
    Rating,
    All,
}

impl FromStr for InfoType {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(InfoType::Title),
            "plot" => Ok(InfoType::Plot),
            "rating" => Ok(InfoType::Rating),
            "all" => Ok(InfoType::All),
            _ => Err(ModelError::InvalidInfoType(s.to_string())),
        }
    }
}

/// 媒体完整记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub ratings: Option<Value>,
    pub metascore: Option<String>,
    pub box_office: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub id: i64,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPlot {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
    pub plot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRatings {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
    pub ratings: Option<Value>,
    pub metascore: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MediaView {
    Title(MediaTitle),
    Plot(MediaPlot),
    Rating(MediaRatings),
    All(MediaRecord),
}

impl MediaRecord {
    pub fn project(self, info: InfoType) -> MediaView {
        match info {
            InfoType::Title => MediaView::Title(MediaTitle {
                id: self.id,
                title: self.title,
                category: self.category,
            }),
            InfoType::Plot => MediaView::Plot(MediaPlot {
                id: self.id,
                title: self.title,
                year: self.year,
                category: self.category,
                plot: self.plot,
            }),
            InfoType::Rating => MediaView::Rating(MediaRatings {
                id: self.id,
                title: self.title,
                year: self.year,
                category: self.category,
                ratings: self.ratings,
                metascore: self.metascore,
            }),
            InfoType::All => MediaView::All(self),
        }
    }
}

impl From<&Media> for MediaRecord {
    fn from(media: &Media) -> Self {
        MediaRecord {
            id: media.id.as_i64(),
            title: media.title.clone(),
            year: media.year.clone(),
            category: media.category.to_string(),
            genre: media.genre.clone(),
            director: media.director.clone(),
            writer: media.writer.clone(),
            actors: media.actors.clone(),
            plot: media.plot.clone(),
            country: media.country.clone(),
            ratings: media.ratings.clone(),
            metascore: media.metascore.clone(),
            box_office: media.box_office.clone(),
        }
    }
}

/// 媒体列表过滤条件，genre/actor/director 均为不区分大小写的子串匹配
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub actor: Option<String>,
    pub director: Option<String>,
}

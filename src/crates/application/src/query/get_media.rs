use crate::query::dao::MediaDao;
use crate::query::QueryError;
use domain::media::Category;
use model::media::{InfoType, MediaFilter, MediaView};
use std::sync::Arc;

/// 媒体列表查询参数（均为原始查询字符串）
#[derive(Debug, Clone, Default)]
pub struct MediaListParams {
    pub info: Option<String>,
    pub media: Option<String>,
    pub genre: Option<String>,
    pub actor: Option<String>,
    pub director: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 获取媒体列表查询服务
#[derive(Clone)]
pub struct GetMedia {
    media_dao: Arc<dyn MediaDao + Send + Sync>,
}

impl GetMedia {
    pub fn new(media_dao: Arc<dyn MediaDao + Send + Sync>) -> Self {
        Self { media_dao }
    }

    /// 过滤按 category、genre、actor、director 顺序生效，
    /// 某一步导致结果为空时返回对应的 NotFound
    pub async fn list(&self, params: &MediaListParams) -> Result<Vec<MediaView>, QueryError> {
        let category = match present(&params.media) {
            Some(media) => Some(media.parse::<Category>().map_err(|e| {
                QueryError::InvalidParameter(e.to_string())
            })?),
            None => None,
        };

        let filter = MediaFilter {
            category: category.map(|c| c.to_string()),
            genre: present(&params.genre),
            actor: present(&params.actor),
            director: present(&params.director),
        };

        let mut records = self.media_dao.search(&filter).await?;
        if records.is_empty() {
            self.explain_empty(&filter).await?;
        }

        let info = params
            .info
            .as_deref()
            .unwrap_or_default()
            .parse::<InfoType>()
            .map_err(|e| QueryError::InvalidParameter(e.to_string()))?;

        Ok(records.drain(..).map(|r| r.project(info)).collect())
    }

    /// 逐步放宽过滤条件，找出第一个使结果为空的过滤项
    async fn explain_empty(&self, filter: &MediaFilter) -> Result<(), QueryError> {
        let mut step = MediaFilter {
            category: filter.category.clone(),
            ..Default::default()
        };
        if let Some(genre) = &filter.genre {
            step.genre = Some(genre.clone());
            if self.media_dao.search(&step).await?.is_empty() {
                return Err(QueryError::NotFound(format!("Genre {} not found.", genre)));
            }
        }
        if let Some(actor) = &filter.actor {
            step.actor = Some(actor.clone());
            if self.media_dao.search(&step).await?.is_empty() {
                return Err(QueryError::NotFound(format!("Actor {} not found.", actor)));
            }
        }
        if let Some(director) = &filter.director {
            return Err(QueryError::NotFound(format!(
                "Director {} not found.",
                director
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeReadStore;

    fn params(info: &str) -> MediaListParams {
        MediaListParams {
            info: Some(info.to_string()),
            ..Default::default()
        }
    }

    fn query() -> GetMedia {
        GetMedia::new(Arc::new(FakeReadStore::sample()))
    }

    #[tokio::test]
    async fn info_is_required() {
        let err = query().list(&MediaListParams::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid info type. Please specify either title, plot, rating, or all"
        );
        assert!(matches!(err, QueryError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn bad_category_is_rejected() {
        let mut p = params("title");
        p.media = Some("podcast".to_string());
        let err = query().list(&p).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Media must be either movie or series if specified."
        );
    }

    #[tokio::test]
    async fn filters_narrow_in_order() {
        let mut p = params("title");
        p.media = Some("movie".to_string());
        p.genre = Some("sci".to_string());
        let found = query().list(&p).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn first_emptying_filter_is_reported() {
        let mut p = params("all");
        p.genre = Some("western".to_string());
        p.actor = Some("nobody".to_string());
        let err = query().list(&p).await.unwrap_err();
        assert_eq!(err.to_string(), "Genre western not found.");

        let mut p = params("all");
        p.genre = Some("sci".to_string());
        p.actor = Some("weaver".to_string());
        p.director = Some("nolan".to_string());
        let err = query().list(&p).await.unwrap_err();
        assert_eq!(err.to_string(), "Director nolan not found.");

        let mut p = params("all");
        p.actor = Some("nobody".to_string());
        let err = query().list(&p).await.unwrap_err();
        assert_eq!(err.to_string(), "Actor nobody not found.");
    }
}

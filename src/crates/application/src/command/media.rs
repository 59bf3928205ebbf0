use crate::error::AppError;
use crate::shared::{MetadataLookup, MetadataProvider};
use domain::media::{Category, Media, MediaRepository};
use domain::user::User;
use domain::value::MediaId;
use log::info;
use std::sync::Arc;

/// 查找结果：本地已有，或刚从提供方抓取并入库
#[derive(Debug, Clone)]
pub enum MediaLookup {
    Existing(Media),
    Created(Media),
}

impl MediaLookup {
    pub fn media(&self) -> &Media {
        match self {
            MediaLookup::Existing(m) | MediaLookup::Created(m) => m,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, MediaLookup::Created(_))
    }
}

pub struct MediaAppService {
    media_repo: Arc<dyn MediaRepository>,
    provider: Arc<dyn MetadataProvider>,
}

impl MediaAppService {
    pub fn new(media_repo: Arc<dyn MediaRepository>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            media_repo,
            provider,
        }
    }

    /// 先查本地，没有再向元数据提供方查询并保存
    pub async fn find_or_fetch(
        &self,
        title: Option<&str>,
        category: Category,
    ) -> Result<MediaLookup, AppError> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::InvalidInput("A title parameter is required".to_string()))?;

        if let Some(media) = self.media_repo.find_by_title(title, category).await? {
            return Ok(MediaLookup::Existing(media));
        }

        let mut media = match self.provider.lookup(title, category).await? {
            MetadataLookup::Found(media) => media,
            MetadataLookup::NotFound => {
                return Err(AppError::NotFound("Title could not be found".to_string()))
            }
        };
        if media.category != category {
            return Err(AppError::InvalidInput(format!(
                "This title corresponds to {}, not {}.",
                media.category.describe(),
                category.describe()
            )));
        }

        // 提供方可能做了模糊匹配，返回的标题已在本地
        if let Some(existing) = self.media_repo.find_by_title(&media.title, category).await? {
            return Ok(MediaLookup::Existing(existing));
        }

        self.media_repo.save(&mut media).await?;
        info!("{} '{}' fetched and stored with id {}", category, media.title, media.id);
        Ok(MediaLookup::Created(media))
    }

    /// 仅管理员可删除媒体
    pub async fn delete_media(&self, actor: &User, id: MediaId) -> Result<Media, AppError> {
        if !actor.is_admin {
            return Err(AppError::Forbidden(
                "Only admin users can delete media.".to_string(),
            ));
        }
        let media = self
            .media_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media with id {} not found", id)))?;
        self.media_repo.delete(media.id).await?;
        info!("media '{}' deleted by {}", media.title, actor.username);
        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{InMemoryMedia, StubProvider};

    fn service(provider: StubProvider) -> (MediaAppService, Arc<InMemoryMedia>) {
        let media = Arc::new(InMemoryMedia::default());
        (
            MediaAppService::new(media.clone(), Arc::new(provider)),
            media,
        )
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let (svc, _) = service(StubProvider::empty());
        let err = svc.find_or_fetch(Some("  "), Category::Movie).await.unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "A title parameter is required"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn local_match_skips_provider() {
        let (svc, repo) = service(StubProvider::empty());
        repo.insert(Media::new("Heat", Category::Movie));

        let found = svc.find_or_fetch(Some("heat"), Category::Movie).await.unwrap();
        assert!(!found.is_created());
        assert_eq!(found.media().title, "Heat");
    }

    #[tokio::test]
    async fn fetched_media_is_stored() {
        let mut fetched = Media::new("Arrival", Category::Movie);
        fetched.year = Some("2016".to_string());
        let (svc, repo) = service(StubProvider::with(fetched));

        let created = svc.find_or_fetch(Some("arrival"), Category::Movie).await.unwrap();
        assert!(created.is_created());
        assert!(!created.media().id.is_unsaved());
        assert_eq!(repo.len(), 1);

        // second lookup is served locally
        let again = svc.find_or_fetch(Some("Arrival"), Category::Movie).await.unwrap();
        assert!(!again.is_created());
    }

    #[tokio::test]
    async fn category_mismatch_is_reported() {
        let (svc, repo) = service(StubProvider::with(Media::new("Fargo", Category::Series)));
        let err = svc.find_or_fetch(Some("Fargo"), Category::Movie).await.unwrap_err();
        match err {
            AppError::InvalidInput(msg) => {
                assert_eq!(msg, "This title corresponds to a TV series, not a movie.")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn unknown_title_is_not_found() {
        let (svc, _) = service(StubProvider::empty());
        let err = svc.find_or_fetch(Some("zzzz"), Category::Series).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_admin_deletes_media() {
        let (svc, repo) = service(StubProvider::empty());
        let heat = repo.insert(Media::new("Heat", Category::Movie));
        let member = User::new("alice", "a@x.io", "h", None, false);
        let admin = User::new("admin", "r@x.io", "h", None, true);

        let err = svc.delete_media(&member, heat.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = svc.delete_media(&admin, MediaId::from(404)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let deleted = svc.delete_media(&admin, heat.id).await.unwrap();
        assert_eq!(deleted.title, "Heat");
        assert_eq!(repo.len(), 0);
    }
}

use crate::error::AppError;
use domain::interaction::{
    Flag, Interaction, InteractionError, InteractionPatch, InteractionRepository, Rating,
};
use domain::media::MediaRepository;
use domain::user::User;
use domain::value::{InteractionId, MediaId};
use log::{info, warn};
use std::sync::Arc;

/// 交互请求体的原始字段，尚未校验。
/// rating: `None` 未提供，`Some(None)` 显式为 null（清除评分）。
#[derive(Debug, Clone, Default)]
pub struct InteractionInput {
    pub watched: Option<String>,
    pub rating: Option<Option<i64>>,
    pub watchlist: Option<String>,
}

impl InteractionInput {
    pub fn parse(&self) -> Result<InteractionPatch, InteractionError> {
        Ok(InteractionPatch {
            watched: self.watched.as_deref().map(str::parse::<Flag>).transpose()?,
            rating: self
                .rating
                .map(|r| r.map(Rating::new).transpose())
                .transpose()?,
            watchlist: self.watchlist.as_deref().map(str::parse::<Flag>).transpose()?,
        })
    }
}

pub struct InteractionAppService {
    interaction_repo: Arc<dyn InteractionRepository>,
    media_repo: Arc<dyn MediaRepository>,
}

impl InteractionAppService {
    pub fn new(
        interaction_repo: Arc<dyn InteractionRepository>,
        media_repo: Arc<dyn MediaRepository>,
    ) -> Self {
        Self {
            interaction_repo,
            media_repo,
        }
    }

    pub async fn create(
        &self,
        user: &User,
        media_id: MediaId,
        input: InteractionInput,
    ) -> Result<Interaction, AppError> {
        self.ensure_media(media_id).await?;
        let patch = input.parse()?;

        if self
            .interaction_repo
            .find_by_user_and_media(user.id, media_id)
            .await?
            .is_some()
        {
            return Err(InteractionError::AlreadyExists.into());
        }

        let mut interaction = Interaction::new(user.id, media_id, patch);
        self.interaction_repo.save(&mut interaction).await?;
        info!(
            "interaction {} created for user {} on media {}",
            interaction.id, user.id, media_id
        );
        Ok(interaction)
    }

    pub async fn update(
        &self,
        user: &User,
        media_id: MediaId,
        input: InteractionInput,
    ) -> Result<Interaction, AppError> {
        self.ensure_media(media_id).await?;
        let patch = input.parse()?;

        let mut interaction = self
            .interaction_repo
            .find_by_user_and_media(user.id, media_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No interaction found. Use POST to create.".to_string())
            })?;
        interaction.apply(patch);
        self.interaction_repo.save(&mut interaction).await?;
        Ok(interaction)
    }

    /// 删除交互：仅本人或管理员可操作。
    /// 非管理员只能看到自己的记录，找不到时一律 403。
    pub async fn delete(&self, actor: &User, id: InteractionId) -> Result<(), AppError> {
        let found = self
            .interaction_repo
            .find_by_id(id)
            .await?
            .filter(|i| actor.may_manage(i.user_id));

        let Some(interaction) = found else {
            if actor.is_admin {
                return Err(InteractionError::NotFound(id.to_string()).into());
            }
            warn!("{} tried to delete interaction {}", actor.username, id);
            return Err(AppError::Forbidden(
                "Not authorised to delete this interaction.".to_string(),
            ));
        };
        self.interaction_repo.delete(interaction.id).await?;
        info!("interaction {} deleted by {}", id, actor.username);
        Ok(())
    }

    async fn ensure_media(&self, media_id: MediaId) -> Result<(), AppError> {
        match self.media_repo.find_by_id(media_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Media with id {} could not be found",
                media_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{InMemoryInteractions, InMemoryMedia};
    use domain::media::{Category, Media};
    use domain::value::UserId;

    struct Fixture {
        svc: InteractionAppService,
        media: MediaId,
        alice: User,
        bob: User,
    }

    fn fixture() -> Fixture {
        let media_repo = Arc::new(InMemoryMedia::default());
        let media = media_repo.insert(Media::new("Alien", Category::Movie)).id;
        let svc = InteractionAppService::new(Arc::new(InMemoryInteractions::default()), media_repo);
        let mut alice = User::new("alice", "a@x.io", "h", None, false);
        alice.id = UserId::from(1);
        let mut bob = User::new("bobby", "b@x.io", "h", None, false);
        bob.id = UserId::from(2);
        Fixture {
            svc,
            media,
            alice,
            bob,
        }
    }

    fn input(watched: Option<&str>, rating: Option<i64>) -> InteractionInput {
        InteractionInput {
            watched: watched.map(str::to_string),
            rating: rating.map(Some),
            watchlist: None,
        }
    }

    #[tokio::test]
    async fn create_then_duplicate() {
        let f = fixture();
        let created = f.svc.create(&f.alice, f.media, input(Some("yes"), Some(9))).await.unwrap();
        assert_eq!(created.watched, Flag::Yes);
        assert_eq!(created.watchlist, Flag::No);

        let err = f.svc.create(&f.alice, f.media, input(None, None)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Interaction already exists. Use PUT or PATCH to update."
        );
    }

    #[tokio::test]
    async fn invalid_values_are_unprocessable() {
        let f = fixture();
        let err = f.svc.create(&f.alice, f.media, input(Some("maybe"), None)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InteractionError(InteractionError::InvalidFlag(_))
        ));

        let err = f.svc.create(&f.alice, f.media, input(None, Some(11))).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InteractionError(InteractionError::InvalidRating(11))
        ));
    }

    #[tokio::test]
    async fn unknown_media_is_not_found() {
        let f = fixture();
        let err = f
            .svc
            .create(&f.alice, MediaId::from(77), input(None, None))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Media with id 77 could not be found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_merges_and_requires_existing() {
        let f = fixture();
        let err = f.svc.update(&f.alice, f.media, input(Some("yes"), None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        f.svc.create(&f.alice, f.media, input(None, Some(4))).await.unwrap();
        let updated = f.svc.update(&f.alice, f.media, input(Some("yes"), None)).await.unwrap();
        assert_eq!(updated.watched, Flag::Yes);
        assert_eq!(updated.rating.map(|r| r.value()), Some(4));
    }

    #[tokio::test]
    async fn null_rating_clears_existing_one() {
        let f = fixture();
        f.svc.create(&f.alice, f.media, input(Some("yes"), Some(8))).await.unwrap();
        let cleared = InteractionInput {
            rating: Some(None),
            ..Default::default()
        };
        let updated = f.svc.update(&f.alice, f.media, cleared).await.unwrap();
        assert_eq!(updated.rating, None);
        assert_eq!(updated.watched, Flag::Yes);
    }

    #[tokio::test]
    async fn delete_is_owner_or_admin() {
        let f = fixture();
        let created = f.svc.create(&f.alice, f.media, input(None, None)).await.unwrap();

        let err = f.svc.delete(&f.bob, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // 非管理员删除不存在的 id 同样是 403，只有管理员能得到 404
        let err = f.svc.delete(&f.bob, InteractionId::from(99)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let mut admin = User::new("admin", "root@x.io", "h", None, true);
        admin.id = UserId::from(3);
        let err = f.svc.delete(&admin, InteractionId::from(99)).await.unwrap_err();
        assert_eq!(err.to_string(), "Interaction id 99 not found.");

        f.svc.delete(&f.alice, created.id).await.unwrap();
        let again = f.svc.delete(&f.alice, created.id).await;
        assert!(again.is_err());
    }
}

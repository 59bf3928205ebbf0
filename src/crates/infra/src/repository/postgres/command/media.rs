use super::db_data::media::{self, ActiveModel, Entity, Model};
use async_trait::async_trait;
use domain::media::{Category, Media, MediaError, MediaRepository};
use domain::value::MediaId;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

#[derive(Clone)]
pub struct MediaRepositoryImpl {
    db: DbConn,
}

impl MediaRepositoryImpl {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MediaRepository for MediaRepositoryImpl {
    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, MediaError> {
        let result: Option<Model> = Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| MediaError::DbErr(e.to_string()))?;
        result.map(Media::try_from).transpose()
    }

    async fn find_by_title(
        &self,
        title: &str,
        category: Category,
    ) -> Result<Option<Media>, MediaError> {
        // lower(title) = lower($1)，同名时取最早入库的一条
        let result: Option<Model> = Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(media::Column::Title)))
                    .eq(title.trim().to_lowercase()),
            )
            .filter(media::Column::Category.eq(category.as_str()))
            .order_by_asc(media::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| MediaError::DbErr(e.to_string()))?;
        result.map(Media::try_from).transpose()
    }

    async fn save(&self, media: &mut Media) -> Result<(), MediaError> {
        let active_model: ActiveModel = (&*media).into();
        if media.id.is_unsaved() {
            let model = active_model
                .insert(&self.db)
                .await
                .map_err(|e| MediaError::DbErr(e.to_string()))?;
            media.id = MediaId::from(model.id);
        } else {
            active_model
                .update(&self.db)
                .await
                .map_err(|e| MediaError::DbErr(e.to_string()))?;
        }
        Ok(())
    }

    async fn delete(&self, id: MediaId) -> Result<(), MediaError> {
        let result = Entity::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| MediaError::DbErr(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(MediaError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

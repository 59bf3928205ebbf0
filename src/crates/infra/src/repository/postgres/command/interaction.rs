use super::db_data::interaction::{self, ActiveModel, Entity, Model};
use super::unique_violation;
use async_trait::async_trait;
use domain::interaction::{Interaction, InteractionError, InteractionRepository};
use domain::value::{InteractionId, MediaId, UserId};
use sea_orm::*;

#[derive(Clone)]
pub struct InteractionRepositoryImpl {
    db: DbConn,
}

impl InteractionRepositoryImpl {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_save_error(e: DbErr) -> InteractionError {
    match unique_violation(&e) {
        Some(_) => InteractionError::AlreadyExists,
        None => InteractionError::DbErr(e.to_string()),
    }
}

#[async_trait]
impl InteractionRepository for InteractionRepositoryImpl {
    async fn find_by_id(&self, id: InteractionId) -> Result<Option<Interaction>, InteractionError> {
        let result: Option<Model> = Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| InteractionError::DbErr(e.to_string()))?;
        result.map(Interaction::try_from).transpose()
    }

    async fn find_by_user_and_media(
        &self,
        user_id: UserId,
        media_id: MediaId,
    ) -> Result<Option<Interaction>, InteractionError> {
        let result: Option<Model> = Entity::find()
            .filter(interaction::Column::UserId.eq(user_id.as_i64()))
            .filter(interaction::Column::MediaId.eq(media_id.as_i64()))
            .one(&self.db)
            .await
            .map_err(|e| InteractionError::DbErr(e.to_string()))?;
        result.map(Interaction::try_from).transpose()
    }

    async fn save(&self, agg: &mut Interaction) -> Result<(), InteractionError> {
        let active_model: ActiveModel = (&*agg).into();
        if agg.id.is_unsaved() {
            let model = active_model.insert(&self.db).await.map_err(map_save_error)?;
            agg.id = InteractionId::from(model.id);
        } else {
            active_model.update(&self.db).await.map_err(map_save_error)?;
        }
        Ok(())
    }

    async fn delete(&self, id: InteractionId) -> Result<(), InteractionError> {
        let result = Entity::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| InteractionError::DbErr(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(InteractionError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

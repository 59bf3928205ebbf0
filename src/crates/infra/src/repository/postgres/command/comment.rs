use super::db_data::comment::{self, ActiveModel, Entity, Model};
use async_trait::async_trait;
use domain::comment::{Comment, CommentError, CommentRepository};
use domain::value::CommentId;
use sea_orm::sea_query::Expr;
use sea_orm::*;

#[derive(Clone)]
pub struct CommentRepositoryImpl {
    db: DbConn,
}

impl CommentRepositoryImpl {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentError> {
        let result: Option<Model> = Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| CommentError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, agg: &mut Comment) -> Result<(), CommentError> {
        let active_model: ActiveModel = (&*agg).into();
        if agg.id.is_unsaved() {
            let model = active_model
                .insert(&self.db)
                .await
                .map_err(|e| CommentError::DbErr(e.to_string()))?;
            agg.id = CommentId::from(model.id);
        } else {
            active_model
                .update(&self.db)
                .await
                .map_err(|e| CommentError::DbErr(e.to_string()))?;
        }
        Ok(())
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CommentError::DbErr(e.to_string()))?;

        // 回复提升为顶层评论
        Entity::update_many()
            .col_expr(comment::Column::ParentId, Expr::value(Option::<i64>::None))
            .filter(comment::Column::ParentId.eq(id.as_i64()))
            .exec(&txn)
            .await
            .map_err(|e| CommentError::DbErr(e.to_string()))?;

        let result = Entity::delete_by_id(id.as_i64())
            .exec(&txn)
            .await
            .map_err(|e| CommentError::DbErr(e.to_string()))?;
        if result.rows_affected == 0 {
            return Err(CommentError::NotFound(id.to_string()));
        }

        txn.commit()
            .await
            .map_err(|e| CommentError::DbErr(e.to_string()))?;
        Ok(())
    }
}

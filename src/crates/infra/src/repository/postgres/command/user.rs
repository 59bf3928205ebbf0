use super::db_data::user::{self, ActiveModel, Entity};
use super::unique_violation;
use async_trait::async_trait;
use domain::user::{User, UserError};
use domain::value::UserId;
use sea_orm::*;

#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: DatabaseConnection,
}

impl UserRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, condition: Condition) -> Result<Option<User>, UserError> {
        let result = Entity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| UserError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }
}

/// 用户名/邮箱唯一约束冲突映射为对应的领域错误
fn map_save_error(e: DbErr) -> UserError {
    match unique_violation(&e) {
        Some(detail) if detail.contains("email") => UserError::EmailTaken,
        Some(_) => UserError::UsernameTaken,
        None => UserError::DbErr(e.to_string()),
    }
}

#[async_trait]
impl domain::user::UserRepository for UserRepositoryImpl {
    async fn count(&self) -> Result<u64, UserError> {
        let count = user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| UserError::DbErr(e.to_string()))?;
        Ok(count)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let result = user::Entity::find_by_id(id.as_i64())
            .one(&self.db)
            .await
            .map_err(|e| UserError::DbErr(e.to_string()))?;
        Ok(result.map(|model| model.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.find_one(Condition::all().add(user::Column::Username.eq(username)))
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_one(Condition::all().add(user::Column::Email.eq(email)))
            .await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError> {
        self.find_one(
            Condition::any()
                .add(user::Column::Username.eq(login))
                .add(user::Column::Email.eq(login)),
        )
        .await
    }

    async fn save(&self, agg: &mut User) -> Result<(), UserError> {
        let active_model: ActiveModel = (&*agg).into();
        if agg.id.is_unsaved() {
            let model = active_model.insert(&self.db).await.map_err(map_save_error)?;
            agg.id = UserId::from(model.id);
        } else {
            active_model.update(&self.db).await.map_err(map_save_error)?;
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = Entity::delete_by_id(id.as_i64())
            .exec(&self.db)
            .await
            .map_err(|e| UserError::DbErr(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(UserError::UserNotFound(id.to_string()));
        }

        Ok(())
    }
}

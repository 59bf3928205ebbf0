use domain::user::User;
use domain::value::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub location: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Interaction,
    Comment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Interaction => Entity::has_many(super::interaction::Entity)
                .from(Column::Id)
                .to(super::interaction::Column::UserId)
                .into(),
            Self::Comment => Entity::has_many(super::comment::Entity)
                .from(Column::Id)
                .to(super::comment::Column::UserId)
                .into(),
        }
    }
}

impl Related<super::interaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interaction.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            // 未保存的用户交给数据库分配自增 id
            id: if user.id.is_unsaved() {
                NotSet
            } else {
                Set(user.id.as_i64())
            },
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            location: Set(user.location.clone()),
            is_admin: Set(user.is_admin),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: UserId::from(model.id),
            username: model.username,
            email: model.email,
            password: model.password,
            location: model.location,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

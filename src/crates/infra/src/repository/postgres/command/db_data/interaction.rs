use domain::interaction::{Interaction, InteractionError, Rating};
use domain::value::{InteractionId, MediaId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

/// (user_id, media_id) 上有唯一索引
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "interaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    #[sea_orm(column_type = "BigInteger")]
    pub user_id: i64,
    #[sea_orm(column_type = "BigInteger")]
    pub media_id: i64,
    /// yes | no
    pub watched: String,
    pub rating: Option<i32>,
    /// yes | no
    pub watchlist: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Media,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::User => Entity::belongs_to(super::user::Entity)
                .from(Column::UserId)
                .to(super::user::Column::Id)
                .into(),
            Self::Media => Entity::belongs_to(super::media::Entity)
                .from(Column::MediaId)
                .to(super::media::Column::Id)
                .into(),
        }
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Interaction> for ActiveModel {
    fn from(interaction: &Interaction) -> Self {
        Self {
            id: if interaction.id.is_unsaved() {
                NotSet
            } else {
                Set(interaction.id.as_i64())
            },
            user_id: Set(interaction.user_id.as_i64()),
            media_id: Set(interaction.media_id.as_i64()),
            watched: Set(interaction.watched.as_str().to_string()),
            rating: Set(interaction.rating.map(|r| r.value())),
            watchlist: Set(interaction.watchlist.as_str().to_string()),
            created_at: Set(interaction.created_at),
            updated_at: Set(interaction.updated_at),
        }
    }
}

impl TryFrom<Model> for Interaction {
    type Error = InteractionError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Interaction {
            id: InteractionId::from(model.id),
            user_id: UserId::from(model.user_id),
            media_id: MediaId::from(model.media_id),
            watched: model.watched.parse()?,
            rating: model.rating.map(|r| Rating::new(r as i64)).transpose()?,
            watchlist: model.watchlist.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

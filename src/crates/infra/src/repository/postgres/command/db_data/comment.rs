use domain::comment::Comment;
use domain::value::{CommentId, MediaId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created: DateTime,
    /// 父评论被删除时由外键置空
    #[sea_orm(column_type = "BigInteger", nullable)]
    pub parent_id: Option<i64>,
    #[sea_orm(column_type = "BigInteger")]
    pub user_id: i64,
    #[sea_orm(column_type = "BigInteger")]
    pub media_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Media,
    Parent,
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
            Self::Parent => Entity::belongs_to(Entity)
                .from(Column::ParentId)
                .to(Column::Id)
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

impl From<&Comment> for ActiveModel {
    fn from(comment: &Comment) -> Self {
        Self {
            id: if comment.id.is_unsaved() {
                NotSet
            } else {
                Set(comment.id.as_i64())
            },
            content: Set(comment.content.clone()),
            created: Set(comment.created),
            parent_id: Set(comment.parent_id.map(|p| p.as_i64())),
            user_id: Set(comment.user_id.as_i64()),
            media_id: Set(comment.media_id.as_i64()),
        }
    }
}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Comment {
            id: CommentId::from(model.id),
            content: model.content,
            created: model.created,
            parent_id: model.parent_id.map(CommentId::from),
            user_id: UserId::from(model.user_id),
            media_id: MediaId::from(model.media_id),
        }
    }
}

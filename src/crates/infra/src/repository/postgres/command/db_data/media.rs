use domain::media::{Media, MediaError};
use domain::value::MediaId;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[sea_orm(column_type = "BigInteger")]
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    /// movie | series
    pub category: String,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub plot: Option<String>,
    pub country: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub ratings: Option<Json>,
    pub metascore: Option<String>,
    pub box_office: Option<String>,
    pub created_at: DateTime,
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
                .to(super::interaction::Column::MediaId)
                .into(),
            Self::Comment => Entity::has_many(super::comment::Entity)
                .from(Column::Id)
                .to(super::comment::Column::MediaId)
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

impl From<&Media> for ActiveModel {
    fn from(media: &Media) -> Self {
        Self {
            id: if media.id.is_unsaved() {
                NotSet
            } else {
                Set(media.id.as_i64())
            },
            title: Set(media.title.clone()),
            year: Set(media.year.clone()),
            category: Set(media.category.as_str().to_string()),
            genre: Set(media.genre.clone()),
            director: Set(media.director.clone()),
            writer: Set(media.writer.clone()),
            actors: Set(media.actors.clone()),
            plot: Set(media.plot.clone()),
            country: Set(media.country.clone()),
            ratings: Set(media.ratings.clone()),
            metascore: Set(media.metascore.clone()),
            box_office: Set(media.box_office.clone()),
            created_at: Set(media.created_at),
        }
    }
}

impl TryFrom<Model> for Media {
    type Error = MediaError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Media {
            id: MediaId::from(model.id),
            title: model.title,
            year: model.year,
            category: model.category.parse()?,
            genre: model.genre,
            director: model.director,
            writer: model.writer,
            actors: model.actors,
            plot: model.plot,
            country: model.country,
            ratings: model.ratings,
            metascore: model.metascore,
            box_office: model.box_office,
            created_at: model.created_at,
        })
    }
}

use application::query::dao::MediaDao;
use application::query::QueryError;
use async_trait::async_trait;
use model::interaction::MediaBrief;
use model::media::{MediaFilter, MediaRecord};
use sea_orm::*;
use sea_orm::prelude::Json;

pub struct MediaDaoImpl {
    db: DatabaseConnection,
}

impl MediaDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct MediaRow {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub ratings: Option<Json>,
    pub metascore: Option<String>,
    pub box_office: Option<String>,
}

impl From<MediaRow> for MediaRecord {
    fn from(row: MediaRow) -> Self {
        MediaRecord {
            id: row.id,
            title: row.title,
            year: row.year,
            category: row.category,
            genre: row.genre,
            director: row.director,
            writer: row.writer,
            actors: row.actors,
            plot: row.plot,
            country: row.country,
            ratings: row.ratings,
            metascore: row.metascore,
            box_office: row.box_office,
        }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct MediaBriefRow {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
}

/// 组装媒体搜索语句；文本条件均为不区分大小写的子串匹配
fn search_statement(filter: &MediaFilter) -> Statement {
    let mut sql = String::from(
        "SELECT id, title, year, category, genre, director, writer, actors, plot, \
         country, ratings, metascore, box_office FROM media",
    );
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        values.push(category.clone().into());
        conditions.push(format!("category = ${}", values.len()));
    }
    for (column, needle) in [
        ("genre", &filter.genre),
        ("actors", &filter.actor),
        ("director", &filter.director),
    ] {
        if let Some(needle) = needle {
            values.push(needle.clone().into());
            conditions.push(format!("{} ILIKE '%' || ${} || '%'", column, values.len()));
        }
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id");
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[async_trait]
impl MediaDao for MediaDaoImpl {
    async fn search(&self, filter: &MediaFilter) -> Result<Vec<MediaRecord>, QueryError> {
        let rows = MediaRow::find_by_statement(search_statement(filter))
            .all(&self.db)
            .await
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(MediaRecord::from).collect())
    }

    async fn get_brief_by_title(&self, title: &str) -> Result<Option<MediaBrief>, QueryError> {
        let row = MediaBriefRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT id, title, year, category
            FROM media
            WHERE lower(title) = lower($1)
            ORDER BY id
            LIMIT 1
            "#,
            vec![title.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(row.map(|r| MediaBrief {
            id: r.id,
            title: r.title,
            year: r.year,
            category: r.category,
        }))
    }
}

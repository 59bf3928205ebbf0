use application::query::dao::InteractionDao;
use application::query::QueryError;
use async_trait::async_trait;
use model::interaction::{
    InteractionFilter, InteractionStats, InteractionView, MediaBrief, UserBrief,
};
use sea_orm::*;

pub struct InteractionDaoImpl {
    db: DatabaseConnection,
}

impl InteractionDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn query_views(
        &self,
        condition: &str,
        value: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        let sql = format!(
            "{} WHERE {} = $1{} ORDER BY i.id",
            SELECT_VIEW,
            condition,
            filter_clause(filter)
        );
        let rows = InteractionRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            vec![value.into()],
        ))
        .all(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(InteractionView::from).collect())
    }
}

const SELECT_VIEW: &str = r#"
    SELECT
        i.id, i.watched, i.rating, i.watchlist,
        m.id AS media_id, m.title, m.year, m.category,
        u.username, u.location
    FROM interaction i
    JOIN media m ON m.id = i.media_id
    JOIN users u ON u.id = i.user_id
"#;

fn filter_clause(filter: &InteractionFilter) -> String {
    let mut clause = String::new();
    if filter.watched {
        clause.push_str(" AND i.watched = 'yes'");
    }
    if filter.rated {
        clause.push_str(" AND i.rating IS NOT NULL");
    }
    if filter.watchlist {
        clause.push_str(" AND i.watchlist = 'yes'");
    }
    clause
}

#[derive(Debug, Clone, FromQueryResult)]
struct InteractionRow {
    pub id: i64,
    pub watched: String,
    pub rating: Option<i32>,
    pub watchlist: String,
    pub media_id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
    pub username: String,
    pub location: Option<String>,
}

impl From<InteractionRow> for InteractionView {
    fn from(row: InteractionRow) -> Self {
        InteractionView {
            id: row.id,
            media: MediaBrief {
                id: row.media_id,
                title: row.title,
                year: row.year,
                category: row.category,
            },
            watched: row.watched,
            rating: row.rating,
            watchlist: row.watchlist,
            user: UserBrief {
                username: row.username,
                location: row.location,
            },
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    pub total: i64,
    pub watched_count: i64,
    pub rating_count: i64,
    pub average_rating: Option<f64>,
    pub watchlist_count: i64,
}

#[async_trait]
impl InteractionDao for InteractionDaoImpl {
    async fn get_by_id(&self, id: i64) -> Result<Option<InteractionView>, QueryError> {
        let row = InteractionRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{} WHERE i.id = $1", SELECT_VIEW),
            vec![id.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(row.map(InteractionView::from))
    }

    async fn get_by_user(
        &self,
        user_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        self.query_views("i.user_id", user_id, filter).await
    }

    async fn get_by_media(
        &self,
        media_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        self.query_views("i.media_id", media_id, filter).await
    }

    async fn get_stats(&self, media_id: i64) -> Result<InteractionStats, QueryError> {
        let row = StatsRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE watched = 'yes') AS watched_count,
                COUNT(rating) AS rating_count,
                AVG(rating)::float8 AS average_rating,
                COUNT(*) FILTER (WHERE watchlist = 'yes') AS watchlist_count
            FROM interaction
            WHERE media_id = $1
            "#,
            vec![media_id.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;

        Ok(row
            .map(|r| InteractionStats {
                total: r.total,
                watched_count: r.watched_count,
                rating_count: r.rating_count,
                average_rating: r.average_rating,
                watchlist_count: r.watchlist_count,
            })
            .unwrap_or_default())
    }
}

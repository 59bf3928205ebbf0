use application::query::dao::CommentDao;
use application::query::QueryError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use model::comment::CommentRow;
use sea_orm::*;

pub struct CommentDaoImpl {
    db: DatabaseConnection,
}

impl CommentDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct CommentQueryRow {
    pub id: i64,
    pub content: String,
    pub created: NaiveDateTime,
    pub parent_id: Option<i64>,
    pub username: String,
    pub media_title: String,
    pub media_category: String,
}

impl From<CommentQueryRow> for CommentRow {
    fn from(row: CommentQueryRow) -> Self {
        CommentRow {
            id: row.id,
            content: row.content,
            created: row.created,
            parent_id: row.parent_id,
            username: row.username,
            media_title: row.media_title,
            media_category: row.media_category,
        }
    }
}

const SELECT_ROW: &str = r#"
    SELECT
        c.id, c.content, c.created, c.parent_id,
        u.username,
        m.title AS media_title, m.category AS media_category
    FROM comments c
    JOIN users u ON u.id = c.user_id
    JOIN media m ON m.id = c.media_id
"#;

#[async_trait]
impl CommentDao for CommentDaoImpl {
    async fn get_rows(
        &self,
        user_id: Option<i64>,
        media_id: Option<i64>,
    ) -> Result<Vec<CommentRow>, QueryError> {
        let rows = CommentQueryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "{} WHERE ($1::bigint IS NULL OR c.user_id = $1) \
                 AND ($2::bigint IS NULL OR c.media_id = $2) \
                 ORDER BY c.id",
                SELECT_ROW
            ),
            vec![user_id.into(), media_id.into()],
        ))
        .all(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(CommentRow::from).collect())
    }

    async fn get_row(&self, id: i64) -> Result<Option<CommentRow>, QueryError> {
        let row = CommentQueryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{} WHERE c.id = $1", SELECT_ROW),
            vec![id.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(row.map(CommentRow::from))
    }
}

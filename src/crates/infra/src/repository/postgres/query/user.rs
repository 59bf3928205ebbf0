use application::query::dao::UserDao;
use application::query::QueryError;
use async_trait::async_trait;
use model::user::PublicUser;
use sea_orm::*;

pub struct UserDaoImpl {
    db: DatabaseConnection,
}

impl UserDaoImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct PublicUserRow {
    pub id: i64,
    pub username: String,
    pub location: Option<String>,
}

impl From<PublicUserRow> for PublicUser {
    fn from(row: PublicUserRow) -> Self {
        PublicUser {
            id: row.id,
            username: row.username,
            location: row.location,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct IdRow {
    pub id: i64,
}

#[async_trait]
impl UserDao for UserDaoImpl {
    async fn get_all(&self) -> Result<Vec<PublicUser>, QueryError> {
        let rows = PublicUserRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT id, username, location FROM users ORDER BY id",
        ))
        .all(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(PublicUser::from).collect())
    }

    async fn get_by_location(&self, location: &str) -> Result<Vec<PublicUser>, QueryError> {
        let rows = PublicUserRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT id, username, location
            FROM users
            WHERE lower(location) = lower($1)
            ORDER BY id
            "#,
            vec![location.into()],
        ))
        .all(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(PublicUser::from).collect())
    }

    async fn get_id_by_username(&self, username: &str) -> Result<Option<i64>, QueryError> {
        let row = IdRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id FROM users WHERE username = $1",
            vec![username.into()],
        ))
        .one(&self.db)
        .await
        .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(row.map(|r| r.id))
    }
}

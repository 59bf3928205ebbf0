use crate::query::dao::UserDao;
use crate::query::QueryError;
use model::user::PublicUser;
use std::sync::Arc;

/// 用户列表查询服务
#[derive(Clone)]
pub struct GetUsers {
    user_dao: Arc<dyn UserDao + Send + Sync>,
}

impl GetUsers {
    pub fn new(user_dao: Arc<dyn UserDao + Send + Sync>) -> Self {
        Self { user_dao }
    }

    pub async fn get_all(&self) -> Result<Vec<PublicUser>, QueryError> {
        self.user_dao.get_all().await
    }

    pub async fn get_by_location(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<PublicUser>, QueryError> {
        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                QueryError::InvalidInput("Location parameter is required".to_string())
            })?;
        let users = self.user_dao.get_by_location(location).await?;
        if users.is_empty() {
            return Err(QueryError::NotFound(format!("No users found in {}", location)));
        }
        Ok(users)
    }
}

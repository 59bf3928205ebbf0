use crate::query::dao::{InteractionDao, MediaDao, UserDao};
use crate::query::QueryError;
use model::interaction::{InteractionFilter, InteractionSummary, InteractionView};
use std::sync::Arc;

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, QueryError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| QueryError::InvalidInput(message.to_string()))
}

/// 交互记录查询服务
#[derive(Clone)]
pub struct GetInteractions {
    interaction_dao: Arc<dyn InteractionDao + Send + Sync>,
    user_dao: Arc<dyn UserDao + Send + Sync>,
    media_dao: Arc<dyn MediaDao + Send + Sync>,
}

impl GetInteractions {
    pub fn new(
        interaction_dao: Arc<dyn InteractionDao + Send + Sync>,
        user_dao: Arc<dyn UserDao + Send + Sync>,
        media_dao: Arc<dyn MediaDao + Send + Sync>,
    ) -> Self {
        Self {
            interaction_dao,
            user_dao,
            media_dao,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<InteractionView>, QueryError> {
        self.interaction_dao.get_by_id(id).await
    }

    pub async fn for_user(
        &self,
        username: Option<&str>,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        let username = required(username, "Username is required")?;
        let user_id = self
            .user_dao
            .get_id_by_username(username)
            .await?
            .ok_or_else(|| QueryError::NotFound(format!("User {} not found", username)))?;

        let found = self.interaction_dao.get_by_user(user_id, filter).await?;
        if found.is_empty() {
            return Err(QueryError::NotFound(format!(
                "No specified interactions found for '{}'.",
                username
            )));
        }
        Ok(found)
    }

    pub async fn for_media(
        &self,
        title: Option<&str>,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        let title = required(title, "Must enter a value for title.")?;
        let media = self
            .media_dao
            .get_brief_by_title(title)
            .await?
            .ok_or_else(|| QueryError::NotFound(format!("'{}' could not be found.", title)))?;

        let found = self.interaction_dao.get_by_media(media.id, filter).await?;
        if found.is_empty() {
            return Err(QueryError::NotFound(format!(
                "No specified interactions found for '{}'.",
                title
            )));
        }
        Ok(found)
    }

    /// 媒体交互汇总，计数只统计取值为 yes 的记录
    pub async fn summary(&self, title: Option<&str>) -> Result<InteractionSummary, QueryError> {
        let title = required(title, "Title parameter is required.")?;
        let media = self
            .media_dao
            .get_brief_by_title(title)
            .await?
            .ok_or_else(|| QueryError::NotFound(format!("Title {} not found.", title)))?;

        let stats = self.interaction_dao.get_stats(media.id).await?;
        if stats.total == 0 {
            return Err(QueryError::NotFound(format!(
                "No interactions found for {}.",
                title
            )));
        }
        Ok(InteractionSummary {
            title: media.title,
            category: media.category,
            watched_count: stats.watched_count,
            rating_count: stats.rating_count,
            average_rating: stats.average_rating,
            watchlist_count: stats.watchlist_count,
        })
    }
}

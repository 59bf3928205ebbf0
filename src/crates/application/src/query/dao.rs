use crate::query::QueryError;
use async_trait::async_trait;
use model::comment::CommentRow;
use model::interaction::{InteractionFilter, InteractionStats, InteractionView, MediaBrief};
use model::media::{MediaFilter, MediaRecord};
use model::user::PublicUser;

#[async_trait]
pub trait UserDao {
    async fn get_all(&self) -> Result<Vec<PublicUser>, QueryError>;
    /// 所在地精确匹配，不区分大小写
    async fn get_by_location(&self, location: &str) -> Result<Vec<PublicUser>, QueryError>;
    async fn get_id_by_username(&self, username: &str) -> Result<Option<i64>, QueryError>;
}

#[async_trait]
pub trait MediaDao {
    /// 按过滤条件查询，结果按 id 升序
    async fn search(&self, filter: &MediaFilter) -> Result<Vec<MediaRecord>, QueryError>;
    /// 标题不区分大小写精确匹配；同名时取 id 最小的一条
    async fn get_brief_by_title(&self, title: &str) -> Result<Option<MediaBrief>, QueryError>;
}

#[async_trait]
pub trait InteractionDao {
    async fn get_by_id(&self, id: i64) -> Result<Option<InteractionView>, QueryError>;
    async fn get_by_user(
        &self,
        user_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError>;
    async fn get_by_media(
        &self,
        media_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError>;
    async fn get_stats(&self, media_id: i64) -> Result<InteractionStats, QueryError>;
}

#[async_trait]
pub trait CommentDao {
    /// 扁平评论行，按 id 升序；两个条件同时给出时取交集
    async fn get_rows(
        &self,
        user_id: Option<i64>,
        media_id: Option<i64>,
    ) -> Result<Vec<CommentRow>, QueryError>;
    async fn get_row(&self, id: i64) -> Result<Option<CommentRow>, QueryError>;
}

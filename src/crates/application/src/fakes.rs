//! 单元测试用的内存仓储与桩实现

use crate::auth::{PasswordHasher, TokenService, UserClaims};
use crate::error::AppError;
use crate::query::dao::{CommentDao, InteractionDao, MediaDao, UserDao};
use crate::query::QueryError;
use crate::shared::{MetadataLookup, MetadataProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::comment::{Comment, CommentError, CommentRepository};
use domain::interaction::{Interaction, InteractionError, InteractionRepository};
use domain::media::{Category, Media, MediaError, MediaRepository};
use domain::user::{User, UserError, UserRepository};
use domain::value::{CommentId, InteractionId, MediaId, UserId};
use model::comment::CommentRow;
use model::interaction::{
    InteractionFilter, InteractionStats, InteractionView, MediaBrief, UserBrief,
};
use model::media::{MediaFilter, MediaRecord};
use model::user::PublicUser;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<BTreeMap<i64, User>>,
    next_id: Mutex<i64>,
}

impl InMemoryUsers {
    pub fn insert(&self, mut user: User) -> User {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        user.id = UserId::from(*next);
        self.rows
            .lock()
            .unwrap()
            .insert(user.id.as_i64(), user.clone());
        user
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.rows.lock().unwrap().get(&id.as_i64()).cloned()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.rows.lock().unwrap().values().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn count(&self) -> Result<u64, UserError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError> {
        Ok(self.find(|u| u.username == login || u.email == login))
    }

    async fn save(&self, user: &mut User) -> Result<(), UserError> {
        if user.id.is_unsaved() {
            *user = self.insert(user.clone());
        } else {
            self.rows
                .lock()
                .unwrap()
                .insert(user.id.as_i64(), user.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or_else(|| UserError::UserNotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryMedia {
    rows: Mutex<BTreeMap<i64, Media>>,
    next_id: Mutex<i64>,
}

impl InMemoryMedia {
    pub fn insert(&self, mut media: Media) -> Media {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        media.id = MediaId::from(*next);
        self.rows
            .lock()
            .unwrap()
            .insert(media.id.as_i64(), media.clone());
        media
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMedia {
    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, MediaError> {
        Ok(self.rows.lock().unwrap().get(&id.as_i64()).cloned())
    }

    async fn find_by_title(
        &self,
        title: &str,
        category: Category,
    ) -> Result<Option<Media>, MediaError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|m| m.category == category && m.matches_title(title))
            .cloned())
    }

    async fn save(&self, media: &mut Media) -> Result<(), MediaError> {
        if media.id.is_unsaved() {
            *media = self.insert(media.clone());
        } else {
            self.rows
                .lock()
                .unwrap()
                .insert(media.id.as_i64(), media.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: MediaId) -> Result<(), MediaError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or_else(|| MediaError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryInteractions {
    rows: Mutex<BTreeMap<i64, Interaction>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl InteractionRepository for InMemoryInteractions {
    async fn find_by_id(&self, id: InteractionId) -> Result<Option<Interaction>, InteractionError> {
        Ok(self.rows.lock().unwrap().get(&id.as_i64()).cloned())
    }

    async fn find_by_user_and_media(
        &self,
        user_id: UserId,
        media_id: MediaId,
    ) -> Result<Option<Interaction>, InteractionError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|i| i.user_id == user_id && i.media_id == media_id)
            .cloned())
    }

    async fn save(&self, interaction: &mut Interaction) -> Result<(), InteractionError> {
        if interaction.id.is_unsaved() {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            interaction.id = InteractionId::from(*next);
        }
        self.rows
            .lock()
            .unwrap()
            .insert(interaction.id.as_i64(), interaction.clone());
        Ok(())
    }

    async fn delete(&self, id: InteractionId) -> Result<(), InteractionError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or_else(|| InteractionError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryComments {
    rows: Mutex<BTreeMap<i64, Comment>>,
    next_id: Mutex<i64>,
}

impl InMemoryComments {
    pub fn get(&self, id: CommentId) -> Option<Comment> {
        self.rows.lock().unwrap().get(&id.as_i64()).cloned()
    }
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentError> {
        Ok(self.get(id))
    }

    async fn save(&self, comment: &mut Comment) -> Result<(), CommentError> {
        if comment.id.is_unsaved() {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            comment.id = CommentId::from(*next);
        }
        self.rows
            .lock()
            .unwrap()
            .insert(comment.id.as_i64(), comment.clone());
        Ok(())
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentError> {
        let mut rows = self.rows.lock().unwrap();
        rows.remove(&id.as_i64())
            .ok_or_else(|| CommentError::NotFound(id.to_string()))?;
        for reply in rows.values_mut().filter(|c| c.parent_id == Some(id)) {
            reply.parent_id = None;
        }
        Ok(())
    }
}

pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        Ok(format!("hashed:{}", plain))
    }

    fn verify(&self, pwd: &str, hashed_pwd: &str) -> Result<(), AppError> {
        if hashed_pwd == format!("hashed:{}", pwd) {
            Ok(())
        } else {
            Err(AppError::AuthError("password mismatch".to_string()))
        }
    }
}

pub struct FakeTokens;

impl TokenService for FakeTokens {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError> {
        Ok(format!("token:{}", claims.user_id))
    }

    fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        let id = token
            .strip_prefix("token:")
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| AppError::AuthError("bad token".to_string()))?;
        Ok(UserClaims {
            user_id: UserId::from(id),
            username: String::new(),
            is_admin: false,
        })
    }
}

/// 固定返回值的元数据提供方
pub struct StubProvider {
    found: Option<Media>,
}

impl StubProvider {
    pub fn empty() -> Self {
        Self { found: None }
    }

    pub fn with(media: Media) -> Self {
        Self { found: Some(media) }
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    async fn lookup(&self, title: &str, _category: Category) -> Result<MetadataLookup, AppError> {
        Ok(match &self.found {
            Some(media) if media.matches_title(title) => MetadataLookup::Found(media.clone()),
            _ => MetadataLookup::NotFound,
        })
    }
}

/// 查询端的只读内存数据集
///
/// 用户：alice(1, Berlin)、bobby(2)
/// 媒体：Alien(1, movie)、Dark(2, series)、Fargo(3, series)
/// 交互：alice/Alien(看过, 9 分)、alice/Fargo(看过)、bobby/Alien(看过)、bobby/Fargo(看过, 0 分)
/// 评论：alice 在 Alien 下的 1 号评论及其 2 号回复
pub struct FakeReadStore {
    users: Vec<(i64, String, Option<String>)>,
    media: Vec<MediaRecord>,
    interactions: Vec<(i64, InteractionView)>,
    comments: Vec<(i64, i64, CommentRow)>,
}

fn record(id: i64, title: &str, category: &str, genre: &str, actors: &str, director: &str) -> MediaRecord {
    MediaRecord {
        id,
        title: title.to_string(),
        year: None,
        category: category.to_string(),
        genre: Some(genre.to_string()),
        director: Some(director.to_string()),
        writer: None,
        actors: Some(actors.to_string()),
        plot: None,
        country: None,
        ratings: None,
        metascore: None,
        box_office: None,
    }
}

fn contains(haystack: &Option<String>, needle: &Option<String>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack
            .as_deref()
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

impl FakeReadStore {
    pub fn sample() -> Self {
        let users = vec![
            (1, "alice".to_string(), Some("Berlin".to_string())),
            (2, "bobby".to_string(), None),
        ];
        let media = vec![
            record(1, "Alien", "movie", "Horror, Sci-Fi", "Sigourney Weaver, Tom Skerritt", "Ridley Scott"),
            record(2, "Dark", "series", "Drama, Sci-Fi", "Louis Hofmann", "N/A"),
            record(3, "Fargo", "series", "Crime, Drama", "Billy Bob Thornton", "N/A"),
        ];
        let mut store = FakeReadStore {
            users,
            media,
            interactions: Vec::new(),
            comments: Vec::new(),
        };
        store.add_interaction(1, 1, 1, Some(9));
        store.add_interaction(2, 1, 3, None);
        store.add_interaction(3, 2, 1, None);
        store.add_interaction(4, 2, 3, Some(0));

        let created = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 30, 0)
            .unwrap();
        for (id, parent_id) in [(1, None), (2, Some(1))] {
            store.comments.push((
                1,
                1,
                CommentRow {
                    id,
                    content: format!("comment {}", id),
                    created,
                    parent_id,
                    username: "alice".to_string(),
                    media_title: "Alien".to_string(),
                    media_category: "movie".to_string(),
                },
            ));
        }
        store
    }

    fn add_interaction(&mut self, id: i64, user_id: i64, media_id: i64, rating: Option<i32>) {
        let media = self.brief(media_id);
        let (_, username, location) = self.users[(user_id - 1) as usize].clone();
        self.interactions.push((
            user_id,
            InteractionView {
                id,
                media,
                watched: "yes".to_string(),
                rating,
                watchlist: "no".to_string(),
                user: UserBrief { username, location },
            },
        ));
    }

    fn brief(&self, media_id: i64) -> MediaBrief {
        let m = &self.media[(media_id - 1) as usize];
        MediaBrief {
            id: m.id,
            title: m.title.clone(),
            year: m.year.clone(),
            category: m.category.clone(),
        }
    }

    fn public(&self) -> impl Iterator<Item = PublicUser> + '_ {
        self.users.iter().map(|(id, username, location)| PublicUser {
            id: *id,
            username: username.clone(),
            location: location.clone(),
        })
    }
}

#[async_trait]
impl UserDao for FakeReadStore {
    async fn get_all(&self) -> Result<Vec<PublicUser>, QueryError> {
        Ok(self.public().collect())
    }

    async fn get_by_location(&self, location: &str) -> Result<Vec<PublicUser>, QueryError> {
        Ok(self
            .public()
            .filter(|u| {
                u.location
                    .as_deref()
                    .map(|l| l.eq_ignore_ascii_case(location))
                    .unwrap_or(false)
            })
            .collect())
    }

    async fn get_id_by_username(&self, username: &str) -> Result<Option<i64>, QueryError> {
        Ok(self
            .users
            .iter()
            .find(|(_, name, _)| name == username)
            .map(|(id, _, _)| *id))
    }
}

#[async_trait]
impl MediaDao for FakeReadStore {
    async fn search(&self, filter: &MediaFilter) -> Result<Vec<MediaRecord>, QueryError> {
        Ok(self
            .media
            .iter()
            .filter(|m| filter.category.as_deref().map_or(true, |c| m.category == c))
            .filter(|m| contains(&m.genre, &filter.genre))
            .filter(|m| contains(&m.actors, &filter.actor))
            .filter(|m| contains(&m.director, &filter.director))
            .cloned()
            .collect())
    }

    async fn get_brief_by_title(&self, title: &str) -> Result<Option<MediaBrief>, QueryError> {
        Ok(self
            .media
            .iter()
            .find(|m| m.title.eq_ignore_ascii_case(title))
            .map(|m| self.brief(m.id)))
    }
}

#[async_trait]
impl InteractionDao for FakeReadStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<InteractionView>, QueryError> {
        Ok(self
            .interactions
            .iter()
            .find(|(_, v)| v.id == id)
            .map(|(_, v)| v.clone()))
    }

    async fn get_by_user(
        &self,
        user_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        Ok(self
            .interactions
            .iter()
            .filter(|(uid, v)| *uid == user_id && filter.accepts(v))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn get_by_media(
        &self,
        media_id: i64,
        filter: &InteractionFilter,
    ) -> Result<Vec<InteractionView>, QueryError> {
        Ok(self
            .interactions
            .iter()
            .filter(|(_, v)| v.media.id == media_id && filter.accepts(v))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn get_stats(&self, media_id: i64) -> Result<InteractionStats, QueryError> {
        let rows: Vec<&InteractionView> = self
            .interactions
            .iter()
            .map(|(_, v)| v)
            .filter(|v| v.media.id == media_id)
            .collect();
        let ratings: Vec<i32> = rows.iter().filter_map(|v| v.rating).collect();
        Ok(InteractionStats {
            total: rows.len() as i64,
            watched_count: rows.iter().filter(|v| v.watched == "yes").count() as i64,
            rating_count: ratings.len() as i64,
            average_rating: if ratings.is_empty() {
                None
            } else {
                Some(ratings.iter().sum::<i32>() as f64 / ratings.len() as f64)
            },
            watchlist_count: rows.iter().filter(|v| v.watchlist == "yes").count() as i64,
        })
    }
}

#[async_trait]
impl CommentDao for FakeReadStore {
    async fn get_rows(
        &self,
        user_id: Option<i64>,
        media_id: Option<i64>,
    ) -> Result<Vec<CommentRow>, QueryError> {
        Ok(self
            .comments
            .iter()
            .filter(|(uid, mid, _)| {
                user_id.map_or(true, |u| u == *uid) && media_id.map_or(true, |m| m == *mid)
            })
            .map(|(_, _, row)| row.clone())
            .collect())
    }

    async fn get_row(&self, id: i64) -> Result<Option<CommentRow>, QueryError> {
        Ok(self
            .comments
            .iter()
            .find(|(_, _, row)| row.id == id)
            .map(|(_, _, row)| row.clone()))
    }
}

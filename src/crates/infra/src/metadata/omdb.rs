//! OMDb (Open Movie Database) 元数据客户端

use crate::config::OmdbConfig;
use application::error::AppError;
use application::shared::{MetadataLookup, MetadataProvider};
use async_trait::async_trait;
use domain::media::{Category, Media};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// OMDb `?t=` 查询的响应。未命中时只有 `Response: "False"` 和 `Error`。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct OmdbResponse {
    response: String,
    error: Option<String>,
    title: Option<String>,
    year: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    genre: Option<String>,
    director: Option<String>,
    writer: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    country: Option<String>,
    ratings: Option<Value>,
    metascore: Option<String>,
    box_office: Option<String>,
}

/// 把 OMDb 响应转换为未保存的 Media。
///
/// category 取 OMDb 返回的 Type；缺失或无法识别时沿用请求的类别。
fn map_omdb_response(resp: OmdbResponse, requested: Category) -> MetadataLookup {
    if resp.response.eq_ignore_ascii_case("false") {
        return MetadataLookup::NotFound;
    }
    let Some(title) = resp.title.filter(|t| !t.trim().is_empty()) else {
        return MetadataLookup::NotFound;
    };
    let category = resp
        .kind
        .as_deref()
        .and_then(|k| k.parse::<Category>().ok())
        .unwrap_or(requested);

    let mut media = Media::new(&title, category);
    media.year = resp.year;
    media.genre = resp.genre;
    media.director = resp.director;
    media.writer = resp.writer;
    media.actors = resp.actors;
    media.plot = resp.plot;
    media.country = resp.country;
    media.ratings = resp.ratings;
    media.metascore = resp.metascore;
    media.box_office = resp.box_office;
    MetadataLookup::Found(media)
}

pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(cfg: &OmdbConfig) -> Result<Self, AppError> {
        if cfg.api_key.trim().is_empty() {
            warn!("omdb.api_key is empty, metadata lookups will be rejected by OMDb");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AppError::MetadataError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.clone(),
        })
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(&self, title: &str, category: Category) -> Result<MetadataLookup, AppError> {
        debug!("omdb lookup '{}' ({})", title, category);
        let params = [
            ("t", title),
            ("type", category.as_str()),
            ("plot", "full"),
            ("apikey", self.api_key.as_str()),
        ];
        let resp = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::MetadataError(e.to_string()))?;

        let status = resp.status();
        let body: OmdbResponse = resp
            .json()
            .await
            .map_err(|e| AppError::MetadataError(e.to_string()))?;

        if !status.is_success() {
            // OMDb 对无效 key 返回 401，并同样带有 Error 字段
            let reason = body.error.unwrap_or_else(|| status.to_string());
            warn!("omdb request for '{}' failed: {}", title, reason);
            return Err(AppError::MetadataError(reason));
        }
        Ok(map_omdb_response(body, category))
    }
}

use crate::error::ApiError;
use actix_web::HttpResponse;
use serde::{Deserialize, Deserializer};
use serde_json::json;

/// `{"message": ...}` 形式的 200 响应
pub fn message(text: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": text.into() }))
}

/// 刚写入的记录在读模型中查不到时使用
pub fn vanished(kind: &str, id: i64) -> ApiError {
    ApiError::NotFound(format!("{} {} could not be loaded", kind, id))
}

/// 配合 `#[serde(default)]` 使用：字段缺省为 `None`，显式 null 为 `Some(None)`
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

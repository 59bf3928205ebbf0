use crate::error::AppError;
use domain::media::{Category, Media};

/// 第三方元数据查询结果
#[derive(Debug, Clone)]
pub enum MetadataLookup {
    Found(Media),
    NotFound,
}

/// 媒体元数据提供方（如 OMDb）
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// 按标题查询。返回的 Media 的 category 是提供方给出的真实类别，
    /// 可能与请求的类别不同，由调用方决定如何处理。
    async fn lookup(&self, title: &str, category: Category) -> Result<MetadataLookup, AppError>;
}

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use application::error::AppError;
use application::query::QueryError;
use domain::comment::CommentError;
use domain::interaction::InteractionError;
use domain::media::MediaError;
use domain::user::{FieldErrors, UserError};
use log::{error, warn};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// HTTP 层错误，统一渲染为 `{"error": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
}

fn app_status(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
        AppError::MetadataError(_) => StatusCode::BAD_GATEWAY,
        AppError::RepositoryError(_, _) | AppError::UnknownError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::UserError(e) => match e {
            UserError::InvalidUserOrPassword => StatusCode::UNAUTHORIZED,
            UserError::UserNotFound(_) => StatusCode::NOT_FOUND,
            UserError::UsernameTaken | UserError::EmailTaken | UserError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            UserError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        AppError::MediaError(e) => match e {
            MediaError::InvalidCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MediaError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        AppError::InteractionError(e) => match e {
            InteractionError::InvalidFlag(_) | InteractionError::InvalidRating(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            InteractionError::AlreadyExists => StatusCode::BAD_REQUEST,
            InteractionError::NotFound(_) => StatusCode::NOT_FOUND,
            InteractionError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        AppError::CommentError(e) => match e {
            CommentError::EmptyContent | CommentError::ParentMediaMismatch => {
                StatusCode::BAD_REQUEST
            }
            CommentError::NotFound(_) => StatusCode::NOT_FOUND,
            CommentError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

fn query_status(err: &QueryError) -> StatusCode {
    match err {
        QueryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        QueryError::InvalidParameter(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QueryError::NotFound(_) => StatusCode::NOT_FOUND,
        QueryError::ExecutionError(_) | QueryError::DbError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 字段校验错误渲染为 `{"field": ["message", ...]}`
fn field_map(fields: &FieldErrors) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(field, messages)| (field.clone(), json!(messages)))
        .collect();
    Value::Object(map)
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => app_status(e),
            Self::Query(e) => query_status(e),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else if status == StatusCode::FORBIDDEN {
            warn!("access rejected: {}", self);
        }
        let body = match self {
            Self::App(AppError::UserError(UserError::Validation(fields))) => field_map(fields),
            _ => Value::String(self.to_string()),
        };
        HttpResponse::build(status).json(json!({ "error": body }))
    }
}

/// 请求体无法解析时返回 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// 路径中的 id 不是整数时按资源不存在处理
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        ApiError::NotFound(format!("{} not found: {}", req.path(), err)).into()
    })
}

pub fn unauthorized() -> actix_web::Error {
    ApiError::Unauthorized.into()
}

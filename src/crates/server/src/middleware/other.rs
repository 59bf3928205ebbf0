use crate::error::{unauthorized, ApiError};
use crate::AppState;
use actix_cors::Cors;
use application::auth::UserClaims;
use application::error::AppError;
use domain::user::UserRepository;
use infra::repository::postgres::command::UserRepositoryImpl;
use log::warn;

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE", "HEAD"])
        .allow_any_header()
        .max_age(3600)
}

/// 按令牌中的用户 id 加载当前用户，放入 request extensions。
/// 必须在 JwtVerifier 之后执行。
pub async fn authenticator(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let Some(claims) = req.extensions().get::<UserClaims>().cloned() else {
        return Err(unauthorized());
    };

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Missing AppState"))?;

    let repo = UserRepositoryImpl::new(state.db.clone());
    let user = repo
        .find_by_id(claims.user_id)
        .await
        .map_err(|e| ApiError::from(AppError::from(e)))?
        .ok_or_else(|| {
            warn!("token for deleted user {} rejected", claims.username);
            unauthorized()
        })?;

    req.extensions_mut().insert(user);
    next.call(req).await
}

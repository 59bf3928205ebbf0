use crate::error::unauthorized;
use crate::AppState;
use actix_service::{forward_ready, Service, Transform};
use actix_web::{dev::ServiceRequest, dev::ServiceResponse, web, Error, HttpMessage, HttpRequest};
use application::auth::TokenService;
use application::auth::UserClaims;
use application::error::AppError;
use futures::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};
use std::rc::Rc;
use url::Url;

use thiserror::Error;
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("token is unauthorized: {0}")]
    Unauthorized(#[from] AppError),
    #[error("no token found")]
    NoTokenFound,
    #[error("application state is missing")]
    MissingState,
}

// 中间件分两步：
// 1. 工厂 `Transform::new_transform` 拿到链上的下一个服务
// 2. 每个请求调用 `Service::call`
pub struct JwtVerifier {}

impl<S, B> Transform<S, ServiceRequest> for JwtVerifier
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtVerifyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtVerifyMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct JwtVerifyMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtVerifyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);
    fn call(&self, req: ServiceRequest) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let service = self.service.clone();
        let (http_request, payload) = req.into_parts();
        let fut = async move {
            let token_finders: Vec<TokenFinder> = vec![token_from_header, token_from_query];
            let verified = state
                .ok_or(JwtError::MissingState)
                .and_then(|state| verify_jwt(&state, &http_request, &token_finders));
            match verified {
                Ok(claims) => {
                    debug!("{} authenticated as {}", http_request.path(), claims.username);
                    let req = ServiceRequest::from_parts(http_request, payload);
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(e) => {
                    warn!("rejected {}: {}", http_request.path(), e);
                    Err(unauthorized())
                }
            }
        };
        Box::pin(fut)
    }
}

// 提取令牌的函数类型
type TokenFinder = fn(req: &HttpRequest) -> Option<String>;

fn token_from_header(req: &HttpRequest) -> Option<String> {
    let auth_str = req.headers().get("Authorization")?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn token_from_query(req: &HttpRequest) -> Option<String> {
    let url = Url::parse(&format!("http://localhost/?{}", req.query_string())).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.to_string())
}

fn verify_jwt(
    state: &AppState,
    req: &HttpRequest,
    token_finders: &[TokenFinder],
) -> Result<UserClaims, JwtError> {
    let token_str = token_finders
        .iter()
        .find_map(|finder| finder(req))
        .ok_or(JwtError::NoTokenFound)?;
    let claims = state.token_service().verify(&token_str)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn header_token_wins_over_query() {
        let req = TestRequest::default()
            .uri("/comment/create?token=from-query")
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        let finders: Vec<TokenFinder> = vec![token_from_header, token_from_query];
        let token = finders.iter().find_map(|f| f(&req));
        assert_eq!(token.as_deref(), Some("from-header"));
    }

    #[test]
    fn query_token_is_fallback() {
        let req = TestRequest::default()
            .uri("/media/movie?title=Alien&token=abc.def")
            .to_http_request();
        assert_eq!(token_from_header(&req), None);
        assert_eq!(token_from_query(&req).as_deref(), Some("abc.def"));
    }

    #[test]
    fn non_bearer_header_is_ignored() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert_eq!(token_from_header(&req), None);
    }
}

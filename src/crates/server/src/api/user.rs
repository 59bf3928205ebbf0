use crate::api::helper::message;
use crate::error::ApiError;
use crate::middleware::{jwt_verify::JwtVerifier, other};
use crate::AppState;
use actix_web::{guard, middleware::from_fn, web, HttpResponse};
use application::command::user::{DeleteUserCmd, RegisterUserCmd, UpdateProfileCmd};
use domain::user::User;
use domain::value::UserId;
use model::user::{PublicUser, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub location: Option<String>,
}

/// 登录字段接受用户名或邮箱
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(
        rename = "username/email",
        alias = "login",
        alias = "username",
        alias = "email"
    )]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub email: String,
    pub token: String,
    pub is_admin: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state.get_users().get_all().await?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

async fn users_by_location(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> Result<HttpResponse, ApiError> {
    let users: Vec<PublicUser> = state
        .get_users()
        .get_by_location(query.location.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let user = state
        .user_service()
        .register(RegisterUserCmd {
            username: body.username,
            email: body.email,
            password: body.password,
            location: body.location,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}

async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state
        .auth_service()
        .login(&body.login, &body.password)
        .await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        username: session.user.username,
        email: session.user.email,
        token: session.token,
        is_admin: session.user.is_admin,
    }))
}

async fn update_user(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    body: web::Json<UpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    state
        .user_service()
        .update_profile(UpdateProfileCmd {
            user_id: user.id,
            username: body.username,
            email: body.email,
            password: body.password,
            location: body.location,
        })
        .await?;
    Ok(message("User updated successfully"))
}

async fn delete_user(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let target = UserId::from(path.into_inner());
    let deleted = state
        .user_service()
        .delete_user(&user, DeleteUserCmd { target })
        .await?;
    Ok(message(format!("User {} deleted.", deleted.username)))
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope("/user")
            .service(web::resource("").guard(guard::Get()).to(list_users))
            .service(web::resource("/location").route(web::get().to(users_by_location)))
            .service(web::resource("/register").route(web::post().to(register)))
            .service(web::resource("/login").route(web::post().to(login)))
            .service(
                web::scope("")
                    .service(
                        web::resource("")
                            .route(web::put().to(update_user))
                            .route(web::patch().to(update_user)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(delete_user)))
                    .wrap(from_fn(other::authenticator))
                    .wrap(JwtVerifier {}),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::helper::testing::{call, offline_state};
    use actix_web::{http::StatusCode, test, App};

    #[::core::prelude::v1::test]
    fn login_accepts_field_aliases() {
        for key in ["username/email", "login", "username", "email"] {
            let body = json!({ key: "alice", "password": "pw123" });
            let req: LoginRequest = serde_json::from_value(body).unwrap();
            assert_eq!(req.login, "alice");
        }
    }

    #[actix_web::test]
    async fn location_is_required() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        let req = test::TestRequest::get().uri("/user/location").to_request();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Location parameter is required"}));
    }

    #[actix_web::test]
    async fn malformed_register_body_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/user/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn profile_changes_need_a_token() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        for req in [
            test::TestRequest::put().uri("/user").to_request(),
            test::TestRequest::delete().uri("/user/7").to_request(),
        ] {
            let (status, body) = call(&app, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"error": "Unauthorized"}));
        }
    }
}

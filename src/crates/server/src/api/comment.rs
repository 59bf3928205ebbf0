use crate::api::helper::{message, vanished};
use crate::error::ApiError;
use crate::middleware::{jwt_verify::JwtVerifier, other};
use crate::AppState;
use actix_web::{guard, middleware::from_fn, web, HttpResponse};
use application::command::comment::{CreateCommentCmd, UpdateCommentCmd};
use domain::comment::Comment;
use domain::user::User;
use domain::value::CommentId;
use model::comment::CommentView;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub username: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "parent id")]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

async fn load_view(state: &AppState, comment: &Comment) -> Result<CommentView, ApiError> {
    let id = comment.id.as_i64();
    state
        .get_comments()
        .get_by_id(id)
        .await?
        .ok_or_else(|| vanished("comment", id))
}

async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<CommentQuery>,
) -> Result<HttpResponse, ApiError> {
    let tree = state
        .get_comments()
        .list(query.username.as_deref(), query.title.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(tree))
}

async fn create_comment(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let comment = state
        .comment_service()
        .create(
            &user,
            CreateCommentCmd {
                title: body.title,
                category: body.category,
                content: body.content,
                parent_id: body.parent_id,
            },
        )
        .await?;
    let view = load_view(&state, &comment).await?;
    Ok(HttpResponse::Created().json(view))
}

async fn update_comment(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
    body: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let comment = state
        .comment_service()
        .update(
            &user,
            UpdateCommentCmd {
                id: CommentId::from(path.into_inner()),
                content: body.into_inner().content,
            },
        )
        .await?;
    let view = load_view(&state, &comment).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated comment": view })))
}

async fn delete_comment(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = CommentId::from(path.into_inner());
    state.comment_service().delete(&user, id).await?;
    Ok(message(format!("Comment with id {} deleted successfully.", id)))
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope("/comment")
            .service(web::resource("").guard(guard::Get()).to(list_comments))
            .service(
                web::scope("")
                    .service(web::resource("/create").route(web::post().to(create_comment)))
                    .service(
                        web::resource("/{id}")
                            .route(web::patch().to(update_comment))
                            .route(web::delete().to(delete_comment)),
                    )
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
    fn parent_id_accepts_spaced_alias() {
        let req: CreateCommentRequest = serde_json::from_value(json!({
            "title": "Alien",
            "category": "movie",
            "content": "Still holds up.",
            "parent id": 4
        }))
        .unwrap();
        assert_eq!(req.parent_id, Some(4));

        let req: CreateCommentRequest =
            serde_json::from_value(json!({"content": "root", "parent_id": null})).unwrap();
        assert_eq!(req.parent_id, None);
        assert!(req.title.is_none());
    }

    #[actix_web::test]
    async fn writes_need_a_token() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        for req in [
            test::TestRequest::post()
                .uri("/comment/create")
                .set_json(json!({"title": "Alien", "category": "movie", "content": "hi"}))
                .to_request(),
            test::TestRequest::patch()
                .uri("/comment/3")
                .set_json(json!({"content": "edited"}))
                .to_request(),
            test::TestRequest::delete().uri("/comment/3").to_request(),
        ] {
            let (status, body) = call(&app, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"error": "Unauthorized"}));
        }
    }
}

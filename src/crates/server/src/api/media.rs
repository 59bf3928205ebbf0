use crate::api::helper::message;
use crate::error::ApiError;
use crate::middleware::{jwt_verify::JwtVerifier, other};
use crate::AppState;
use actix_web::{guard, middleware::from_fn, web, HttpResponse};
use application::query::get_media::MediaListParams;
use domain::media::Category;
use domain::user::User;
use domain::value::MediaId;
use model::media::MediaRecord;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub info: Option<String>,
    pub media: Option<String>,
    pub genre: Option<String>,
    pub actor: Option<String>,
    pub director: Option<String>,
}

impl From<MediaQuery> for MediaListParams {
    fn from(q: MediaQuery) -> Self {
        MediaListParams {
            info: q.info,
            media: q.media,
            genre: q.genre,
            actor: q.actor,
            director: q.director,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

async fn list_media(
    state: web::Data<AppState>,
    query: web::Query<MediaQuery>,
) -> Result<HttpResponse, ApiError> {
    let params = MediaListParams::from(query.into_inner());
    let media = state.get_media().list(&params).await?;
    Ok(HttpResponse::Ok().json(json!({ "media": media })))
}

/// 本地已有返回 200，新抓取入库返回 201
async fn find_or_fetch(
    state: &AppState,
    title: Option<&str>,
    category: Category,
) -> Result<HttpResponse, ApiError> {
    let lookup = state.media_service().find_or_fetch(title, category).await?;
    let record = MediaRecord::from(lookup.media());
    if lookup.is_created() {
        Ok(HttpResponse::Created().json(record))
    } else {
        Ok(HttpResponse::Ok().json(record))
    }
}

async fn movie(
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
) -> Result<HttpResponse, ApiError> {
    find_or_fetch(&state, query.title.as_deref(), Category::Movie).await
}

async fn tv(
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
) -> Result<HttpResponse, ApiError> {
    find_or_fetch(&state, query.title.as_deref(), Category::Series).await
}

async fn delete_media(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let media = state
        .media_service()
        .delete_media(&user, MediaId::from(path.into_inner()))
        .await?;
    Ok(message(format!("Media {} deleted.", media.title)))
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope("/media")
            .service(web::resource("").guard(guard::Get()).to(list_media))
            .service(
                web::scope("")
                    .service(web::resource("/movie").route(web::get().to(movie)))
                    .service(web::resource("/tv").route(web::get().to(tv)))
                    .service(web::resource("/{id}").route(web::delete().to(delete_media)))
                    .wrap(from_fn(other::authenticator))
                    .wrap(JwtVerifier {}),
            ),
    );
}

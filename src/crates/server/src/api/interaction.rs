use crate::api::helper::{message, nullable, vanished};
use crate::error::ApiError;
use crate::middleware::{jwt_verify::JwtVerifier, other};
use crate::AppState;
use actix_web::{middleware::from_fn, web, HttpResponse};
use application::command::interaction::InteractionInput;
use domain::interaction::Interaction;
use domain::user::User;
use domain::value::{InteractionId, MediaId};
use model::interaction::{InteractionFilter, InteractionView};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct InteractionQuery {
    pub username: Option<String>,
    pub title: Option<String>,
    pub watched: Option<String>,
    pub rating: Option<String>,
    pub watchlist: Option<String>,
}

impl InteractionQuery {
    fn filter(&self) -> InteractionFilter {
        InteractionFilter::from_params(
            self.watched.as_deref(),
            self.rating.as_deref(),
            self.watchlist.as_deref(),
        )
    }
}

/// rating 必须是整数，其他类型在 JSON 解析阶段即被拒绝；
/// `"rating": null` 表示清除评分
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InteractionBody {
    pub watched: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub rating: Option<Option<i64>>,
    pub watchlist: Option<String>,
}

impl From<InteractionBody> for InteractionInput {
    fn from(body: InteractionBody) -> Self {
        InteractionInput {
            watched: body.watched,
            rating: body.rating,
            watchlist: body.watchlist,
        }
    }
}

async fn load_view(state: &AppState, interaction: &Interaction) -> Result<InteractionView, ApiError> {
    let id = interaction.id.as_i64();
    state
        .get_interactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| vanished("interaction", id))
}

async fn by_user(
    state: web::Data<AppState>,
    query: web::Query<InteractionQuery>,
) -> Result<HttpResponse, ApiError> {
    let views = state
        .get_interactions()
        .for_user(query.username.as_deref(), &query.filter())
        .await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn by_media(
    state: web::Data<AppState>,
    query: web::Query<InteractionQuery>,
) -> Result<HttpResponse, ApiError> {
    let views = state
        .get_interactions()
        .for_media(query.title.as_deref(), &query.filter())
        .await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn summary(
    state: web::Data<AppState>,
    query: web::Query<InteractionQuery>,
) -> Result<HttpResponse, ApiError> {
    let summary = state
        .get_interactions()
        .summary(query.title.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn create(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
    body: web::Json<InteractionBody>,
) -> Result<HttpResponse, ApiError> {
    let interaction = state
        .interaction_service()
        .create(&user, MediaId::from(path.into_inner()), body.into_inner().into())
        .await?;
    let view = load_view(&state, &interaction).await?;
    Ok(HttpResponse::Created().json(view))
}

async fn update(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
    body: web::Json<InteractionBody>,
) -> Result<HttpResponse, ApiError> {
    let interaction = state
        .interaction_service()
        .update(&user, MediaId::from(path.into_inner()), body.into_inner().into())
        .await?;
    let view = load_view(&state, &interaction).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn delete(
    state: web::Data<AppState>,
    user: web::ReqData<User>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = InteractionId::from(path.into_inner());
    state.interaction_service().delete(&user, id).await?;
    Ok(message(format!("Interaction with id {} deleted.", id)))
}

/// POST/PATCH/PUT 的路径参数是媒体 id，DELETE 的是交互 id
pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope("/interaction")
            .service(web::resource("/summary").route(web::get().to(summary)))
            .service(
                web::scope("")
                    .service(web::resource("/user").route(web::get().to(by_user)))
                    .service(web::resource("/media").route(web::get().to(by_media)))
                    .service(
                        web::resource("/{id}")
                            .route(web::post().to(create))
                            .route(web::patch().to(update))
                            .route(web::put().to(update))
                            .route(web::delete().to(delete)),
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
    use serde_json::json;

    #[::core::prelude::v1::test]
    fn fractional_rating_is_rejected_by_the_body() {
        let parsed = serde_json::from_value::<InteractionBody>(json!({"rating": 7.5}));
        assert!(parsed.is_err());

        let body: InteractionBody = serde_json::from_value(json!({"watched": "yes"})).unwrap();
        let input = InteractionInput::from(body);
        assert_eq!(input.watched.as_deref(), Some("yes"));
        assert_eq!(input.rating, None);
    }

    #[::core::prelude::v1::test]
    fn null_rating_differs_from_missing_rating() {
        let body: InteractionBody = serde_json::from_value(json!({"rating": null})).unwrap();
        assert_eq!(body.rating, Some(None));

        let body: InteractionBody = serde_json::from_value(json!({"rating": 6})).unwrap();
        assert_eq!(body.rating, Some(Some(6)));

        let body: InteractionBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.rating, None);
    }

    #[::core::prelude::v1::test]
    fn query_builds_yes_only_filter() {
        let query = InteractionQuery {
            watched: Some("yes".to_string()),
            rating: Some("maybe".to_string()),
            ..Default::default()
        };
        let filter = query.filter();
        assert!(filter.watched);
        assert!(!filter.rated);
        assert!(!filter.watchlist);
    }

    #[actix_web::test]
    async fn summary_is_public_but_needs_a_title() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/interaction/summary")
            .to_request();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Title parameter is required."}));
    }

    #[actix_web::test]
    async fn listings_and_writes_need_a_token() {
        let app = test::init_service(
            App::new()
                .app_data(offline_state())
                .configure(crate::configure_service),
        )
        .await;
        for req in [
            test::TestRequest::get()
                .uri("/interaction/user?username=alice")
                .to_request(),
            test::TestRequest::post()
                .uri("/interaction/1")
                .set_json(json!({"watched": "yes"}))
                .to_request(),
            test::TestRequest::delete().uri("/interaction/1").to_request(),
        ] {
            let (status, _) = call(&app, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }
}

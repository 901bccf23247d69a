// src/handlers/favorites.rs
// DOCUMENTATION: HTTP handlers for the caller's saved catalog items

use actix_web::{web, HttpResponse, Responder};

use crate::db::Storage;
use crate::errors::AppError;
use crate::handlers::guards::AuthenticatedUser;
use crate::models::{FavoriteQuery, FavoriteRequest};
use crate::services::favorite_service;

/// GET /api/favorites?kind=
pub async fn list_favorites(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    query: web::Query<FavoriteQuery>,
) -> Result<impl Responder, AppError> {
    let favorites = favorite_service::list(storage.get_ref(), &auth.user, query.kind).await?;
    Ok(HttpResponse::Ok().json(favorites))
}

/// POST /api/favorites
pub async fn add_favorite(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    body: web::Json<FavoriteRequest>,
) -> Result<impl Responder, AppError> {
    let favorite = favorite_service::add(storage.get_ref(), &auth.user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(favorite))
}

/// DELETE /api/favorites/{id}
pub async fn remove_favorite(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    favorite_service::remove(storage.get_ref(), &auth.user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("/{id}", web::delete().to(remove_favorite)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{self, TestContext};
    use crate::models::{Experience, Role};
    use crate::services::catalog_service::{self, fixtures};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};
    use tokio_test::assert_ok;

    #[actix_web::test]
    async fn test_favorites_flow() {
        let ctx = TestContext::new();
        assert_ok!(
            catalog_service::create::<Experience>(
                ctx.storage.as_ref(),
                fixtures::experience("Mergulho", 450.0, 6)
            )
            .await
        );
        let (_, guest) = ctx.sign_in("guest@example.com", Role::User).await;
        let (_, other) = ctx.sign_in("other@example.com", Role::User).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/favorites")
            .cookie(guest.clone())
            .set_json(json!({"itemKind": "experience", "itemId": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let favorite: Value = test::read_body_json(resp).await;
        let id = favorite["id"].as_i64().unwrap_or_default();

        let req = test::TestRequest::post()
            .uri("/api/favorites")
            .cookie(guest.clone())
            .set_json(json!({"itemKind": "experience", "itemId": 1}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/favorites")
            .cookie(guest.clone())
            .set_json(json!({"itemKind": "restaurant", "itemId": 1}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/favorites?kind=experience")
            .cookie(guest.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(|f| f.len()), Some(1));

        let req = test::TestRequest::get()
            .uri("/api/favorites?kind=restaurant")
            .cookie(guest.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/favorites/{}", id))
            .cookie(other)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/favorites/{}", id))
            .cookie(guest)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn test_unknown_kind_is_invalid_input() {
        let ctx = TestContext::new();
        let (_, guest) = ctx.sign_in("guest@example.com", Role::User).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/favorites?kind=spaceship")
            .cookie(guest)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }
}

// src/handlers/catalog.rs
// DOCUMENTATION: HTTP handlers shared by the five catalog collections
// PURPOSE: One generic set of CRUD routes mounted under /api/{collection} per entity

use actix_web::{web, HttpResponse, Responder};

use crate::db::Storage;
use crate::errors::AppError;
use crate::handlers::guards::AdminUser;
use crate::models::{
    Accommodation, CatalogEntity, CatalogQuery, Experience, Package, Restaurant, VehicleRental,
};
use crate::services::catalog_service;

/// GET /api/{collection}
/// Paginated listing with search, filters and sorting
pub async fn list_items<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
    query: web::Query<CatalogQuery>,
) -> Result<impl Responder, AppError> {
    let response = catalog_service::list::<T>(storage.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/{collection}/featured
pub async fn featured_items<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
) -> Result<impl Responder, AppError> {
    let items = catalog_service::featured::<T>(storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/{collection}/{id}
pub async fn get_item<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    match catalog_service::get::<T>(storage.get_ref(), id).await {
        Ok(item) => Ok(HttpResponse::Ok().json(item)),
        Err(AppError::NotFound(msg)) => {
            log::warn!("{} {} not found", T::KIND, id);
            Err(AppError::NotFound(msg))
        }
        Err(e) => Err(e),
    }
}

/// POST /api/{collection}
pub async fn create_item<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
    admin: AdminUser,
    body: web::Json<T::Draft>,
) -> Result<impl Responder, AppError> {
    let item = catalog_service::create::<T>(storage.get_ref(), body.into_inner()).await?;
    log::info!("Admin {} created {} {}", admin.0.id, T::KIND, item.id());
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/{collection}/{id}
pub async fn update_item<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
    admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<T::Patch>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let item = catalog_service::update::<T>(storage.get_ref(), id, body.into_inner()).await?;
    log::info!("Admin {} updated {} {}", admin.0.id, T::KIND, id);
    Ok(HttpResponse::Ok().json(item))
}

/// DELETE /api/{collection}/{id}
pub async fn delete_item<T: CatalogEntity>(
    storage: web::Data<dyn Storage>,
    admin: AdminUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    catalog_service::delete::<T>(storage.get_ref(), id).await?;
    log::info!("Admin {} deleted {} {}", admin.0.id, T::KIND, id);
    Ok(HttpResponse::NoContent().finish())
}

/// Routes for one collection
/// DOCUMENTATION: /featured is registered before /{id} so it is not parsed as an id
fn catalog_scope<T: CatalogEntity>() -> actix_web::Scope {
    web::scope(&format!("/api/{}", T::KIND.collection()))
        .route("", web::get().to(list_items::<T>))
        .route("", web::post().to(create_item::<T>))
        .route("/featured", web::get().to(featured_items::<T>))
        .route("/{id}", web::get().to(get_item::<T>))
        .route("/{id}", web::put().to(update_item::<T>))
        .route("/{id}", web::delete().to(delete_item::<T>))
}

/// Configuration for catalog routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog_scope::<Experience>())
        .service(catalog_scope::<Accommodation>())
        .service(catalog_scope::<Package>())
        .service(catalog_scope::<VehicleRental>())
        .service(catalog_scope::<Restaurant>());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FavoriteStore, TestimonialStore};
    use crate::handlers::test_support::{self, TestContext};
    use crate::models::{ItemKind, NewFavorite, NewTestimonial, Role};
    use crate::services::catalog_service::fixtures;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};
    use tokio_test::assert_ok;

    async fn seed(ctx: &TestContext) {
        let storage = ctx.storage.as_ref();
        let mut diving = fixtures::experience("Mergulho na Baia", 450.0, 6);
        diving.featured = true;
        diving.rating = Some(4.9);
        assert_ok!(catalog_service::create::<Experience>(storage, diving).await);
        assert_ok!(
            catalog_service::create::<Experience>(
                storage,
                fixtures::experience("Trilha do Atalaia", 120.0, 12)
            )
            .await
        );
        assert_ok!(
            catalog_service::create::<Experience>(
                storage,
                fixtures::experience("Passeio de Barco", 250.0, 20)
            )
            .await
        );
    }

    #[actix_web::test]
    async fn test_public_listing_and_lookup() {
        let ctx = TestContext::new();
        seed(&ctx).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/experiences?sort=price_asc&limit=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["data"].as_array().map(|d| d.len()), Some(2));
        assert_eq!(body["data"][0]["title"], "Trilha do Atalaia");

        let req = test::TestRequest::get().uri("/api/experiences?q=barco").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalCount"], 1);

        let req = test::TestRequest::get().uri("/api/experiences/featured").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(|d| d.len()), Some(1));
        assert_eq!(body[0]["title"], "Mergulho na Baia");

        let req = test::TestRequest::get().uri("/api/experiences/2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], 2);

        let req = test::TestRequest::get().uri("/api/experiences/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let req = test::TestRequest::get().uri("/api/accommodations").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalCount"], 0);
    }

    #[actix_web::test]
    async fn test_invalid_price_range_is_rejected() {
        let ctx = TestContext::new();
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/packages?minPrice=500&maxPrice=100")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let req = test::TestRequest::get().uri("/api/packages?sort=cheapest").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unparseable_id_is_json_invalid_input() {
        let ctx = TestContext::new();
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        for uri in ["/api/experiences/abc", "/api/vehicles/99999999999"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], "INVALID_INPUT");
        }
    }

    #[actix_web::test]
    async fn test_huge_page_returns_empty_page() {
        let ctx = TestContext::new();
        seed(&ctx).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/experiences?page=9223372036854775807")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["hasMore"], false);
    }

    #[actix_web::test]
    async fn test_mutations_require_admin() {
        let ctx = TestContext::new();
        let (_, user_cookie) = ctx.sign_in("guest@example.com", Role::User).await;
        let (_, admin_cookie) = ctx.sign_in("admin@example.com", Role::Admin).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;
        let draft = fixtures::vehicle("Buggy 4x4", 300.0, true);

        let req = test::TestRequest::post()
            .uri("/api/vehicles")
            .set_json(&draft)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/vehicles")
            .cookie(user_cookie)
            .set_json(&draft)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/vehicles")
            .cookie(admin_cookie.clone())
            .set_json(&draft)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_i64().unwrap_or_default();

        let req = test::TestRequest::put()
            .uri(&format!("/api/vehicles/{}", id))
            .cookie(admin_cookie.clone())
            .set_json(json!({"pricePerDay": 320.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pricePerDay"], 320.0);
        assert_eq!(body["name"], "Buggy 4x4");

        let req = test::TestRequest::put()
            .uri(&format!("/api/vehicles/{}", id))
            .cookie(admin_cookie.clone())
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let req = test::TestRequest::put()
            .uri(&format!("/api/vehicles/{}", id))
            .cookie(admin_cookie)
            .set_json(json!({"pricePerDay": -5.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_delete_cascades_to_favorites_and_testimonials() {
        let ctx = TestContext::new();
        seed(&ctx).await;
        let (user, _) = ctx.sign_in("guest@example.com", Role::User).await;
        let (_, admin_cookie) = ctx.sign_in("admin@example.com", Role::Admin).await;
        let storage = ctx.storage.as_ref();

        assert_ok!(
            storage
                .create_favorite(NewFavorite {
                    user_id: user.id,
                    item_kind: ItemKind::Experience,
                    item_id: 1,
                })
                .await
        );
        let testimonial = assert_ok!(
            storage
                .create_testimonial(NewTestimonial {
                    user_id: user.id,
                    author_name: "Test User".to_string(),
                    content: "Mergulho inesquecivel".to_string(),
                    rating: 5,
                    experience_id: Some(1),
                    accommodation_id: None,
                    package_id: None,
                })
                .await
        );

        let app = test::init_service(test_support::app(&ctx).configure(config)).await;
        let req = test::TestRequest::delete()
            .uri("/api/experiences/1")
            .cookie(admin_cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri("/api/experiences/1")
            .cookie(admin_cookie)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        assert!(assert_ok!(storage.list_favorites(user.id, None).await).is_empty());
        let kept = assert_ok!(storage.get_testimonial(testimonial.id).await);
        assert_eq!(kept.experience_id, None);
    }
}

// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for users, bookings and dashboard statistics
// PURPOSE: Expose back-office operations via REST endpoints guarded by the admin role

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::{BookingStore, Storage, TestimonialStore, UserStore};
use crate::errors::AppError;
use crate::handlers::guards::AdminUser;
use crate::models::{
    Accommodation, CatalogEntity, Experience, Package, Restaurant, Role, RoleUpdate,
    StatusUpdate, UserResponse, VehicleRental,
};
use crate::services::session_store::SessionStats;
use crate::services::{booking_service, SessionStore};

/// Item counts of one catalog collection
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    pub total: i64,
    pub featured: i64,
}

/// Response for the dashboard statistics endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    /// Keyed by collection name (experiences, accommodations, ...)
    pub catalog: BTreeMap<&'static str, CollectionStats>,
    pub users: i64,
    pub testimonials: i64,
    pub bookings_by_status: BTreeMap<&'static str, i64>,
    pub sessions: SessionStats,
}

async fn collection_stats<T: CatalogEntity>(
    storage: &dyn Storage,
) -> Result<(&'static str, CollectionStats), AppError> {
    let store = T::store(storage);
    let stats = CollectionStats {
        total: store.count().await?,
        featured: store.count_featured().await?,
    };
    Ok((T::KIND.collection(), stats))
}

/// GET /api/admin/stats
/// Get dashboard statistics
///
/// DOCUMENTATION: Counts per catalog collection, users, testimonials,
/// bookings grouped by status and live sessions
pub async fn admin_stats(
    storage: web::Data<dyn Storage>,
    sessions: web::Data<SessionStore>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let storage = storage.get_ref();

    let catalog = BTreeMap::from([
        collection_stats::<Experience>(storage).await?,
        collection_stats::<Accommodation>(storage).await?,
        collection_stats::<Package>(storage).await?,
        collection_stats::<VehicleRental>(storage).await?,
        collection_stats::<Restaurant>(storage).await?,
    ]);

    let bookings_by_status = storage
        .count_bookings_by_status()
        .await?
        .into_iter()
        .map(|(status, count)| (status.as_str(), count))
        .collect();

    let response = AdminStatsResponse {
        catalog,
        users: storage.count_users().await?,
        testimonials: storage.count_testimonials().await?,
        bookings_by_status,
        sessions: sessions.stats().await,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/admin/users
pub async fn list_users(
    storage: web::Data<dyn Storage>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let users: Vec<UserResponse> = storage
        .list_users()
        .await?
        .iter()
        .map(|u| u.to_response())
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// PATCH /api/admin/users/{id}/role
/// DOCUMENTATION: An admin cannot demote themself, so at least one admin remains
pub async fn set_user_role(
    storage: web::Data<dyn Storage>,
    admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<RoleUpdate>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    if id == admin.0.id && body.role != Role::Admin {
        return Err(AppError::InvalidInput(
            "administrators cannot remove their own admin role".to_string(),
        ));
    }

    let user = storage.set_role(id, body.role).await?;
    log::info!("Admin {} set role of user {} to {}", admin.0.id, id, user.role);
    Ok(HttpResponse::Ok().json(user.to_response()))
}

/// GET /api/admin/bookings
pub async fn list_bookings(
    storage: web::Data<dyn Storage>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let bookings = booking_service::list_all(storage.get_ref()).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// PATCH /api/admin/bookings/{id}/status
pub async fn set_booking_status(
    storage: web::Data<dyn Storage>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    let booking =
        booking_service::set_status(storage.get_ref(), path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/stats", web::get().to(admin_stats))
            .route("/users", web::get().to(list_users))
            .route("/users/{id}/role", web::patch().to(set_user_role))
            .route("/bookings", web::get().to(list_bookings))
            .route("/bookings/{id}/status", web::patch().to(set_booking_status)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{self, TestContext};
    use crate::models::{BookingRequest, ItemKind};
    use crate::services::catalog_service::{self, fixtures};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tokio_test::assert_ok;

    #[actix_web::test]
    async fn test_stats_counts_everything() {
        let ctx = TestContext::new();
        let storage = ctx.storage.as_ref();
        let mut featured = fixtures::experience("Mergulho", 450.0, 6);
        featured.featured = true;
        assert_ok!(catalog_service::create::<Experience>(storage, featured).await);
        assert_ok!(
            catalog_service::create::<Experience>(storage, fixtures::experience("Trilha", 90.0, 10))
                .await
        );
        let (guest, _) = ctx.sign_in("guest@example.com", Role::User).await;
        let (_, admin) = ctx.sign_in("admin@example.com", Role::Admin).await;
        assert_ok!(
            booking_service::create_booking(
                storage,
                &guest,
                BookingRequest {
                    item_kind: ItemKind::Experience,
                    item_id: 1,
                    start_date: Utc::now().date_naive() + Duration::days(4),
                    end_date: None,
                    guests: 2,
                    notes: None,
                },
                Utc::now().date_naive(),
            )
            .await
        );

        let app = test::init_service(test_support::app(&ctx).configure(config)).await;
        let req = test::TestRequest::get().uri("/api/admin/stats").cookie(admin).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["catalog"]["experiences"], json!({"total": 2, "featured": 1}));
        assert_eq!(body["catalog"]["restaurants"]["total"], 0);
        assert_eq!(body["users"], 2);
        assert_eq!(body["testimonials"], 0);
        assert_eq!(body["bookingsByStatus"]["pending"], 1);
        assert_eq!(body["bookingsByStatus"]["cancelled"], 0);
        assert_eq!(body["sessions"]["activeSessions"], 2);
    }

    #[actix_web::test]
    async fn test_admin_routes_reject_regular_users() {
        let ctx = TestContext::new();
        let (_, guest) = ctx.sign_in("guest@example.com", Role::User).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        for uri in ["/api/admin/stats", "/api/admin/users", "/api/admin/bookings"] {
            let req = test::TestRequest::get().uri(uri).cookie(guest.clone()).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
        }
    }

    #[actix_web::test]
    async fn test_role_changes() {
        let ctx = TestContext::new();
        let (boss, admin) = ctx.sign_in("boss@example.com", Role::Admin).await;
        let (guest, guest_cookie) = ctx.sign_in("guest@example.com", Role::User).await;
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/admin/users/{}/role", boss.id))
            .cookie(admin.clone())
            .set_json(json!({"role": "user"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/admin/users/{}/role", guest.id))
            .cookie(admin.clone())
            .set_json(json!({"role": "admin"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["role"], "admin");

        // The promotion applies to the existing session
        let req = test::TestRequest::get().uri("/api/admin/users").cookie(guest_cookie).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(|u| u.len()), Some(2));
        assert!(body[0].get("passwordHash").is_none());

        let req = test::TestRequest::patch()
            .uri("/api/admin/users/404/role")
            .cookie(admin)
            .set_json(json!({"role": "admin"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_booking_status_transitions() {
        let ctx = TestContext::new();
        let storage = ctx.storage.as_ref();
        assert_ok!(
            catalog_service::create::<Experience>(storage, fixtures::experience("Mergulho", 450.0, 6))
                .await
        );
        let (guest, _) = ctx.sign_in("guest@example.com", Role::User).await;
        let (_, admin) = ctx.sign_in("admin@example.com", Role::Admin).await;
        let booking = assert_ok!(
            booking_service::create_booking(
                storage,
                &guest,
                BookingRequest {
                    item_kind: ItemKind::Experience,
                    item_id: 1,
                    start_date: Utc::now().date_naive() + Duration::days(1),
                    end_date: None,
                    guests: 1,
                    notes: Some("Vegetariano".to_string()),
                },
                Utc::now().date_naive(),
            )
            .await
        );
        let app = test::init_service(test_support::app(&ctx).configure(config)).await;
        let uri = format!("/api/admin/bookings/{}/status", booking.id);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .cookie(admin.clone())
            .set_json(json!({"status": "confirmed"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "confirmed");

        let req = test::TestRequest::patch()
            .uri(&uri)
            .cookie(admin.clone())
            .set_json(json!({"status": "pending"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .cookie(admin.clone())
            .set_json(json!({"status": "archived"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/admin/bookings").cookie(admin).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["notes"], "Vegetariano");
    }
}

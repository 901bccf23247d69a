// src/handlers/bookings.rs
// DOCUMENTATION: HTTP handlers for reservations made by signed-in users
// PURPOSE: Create, list, view and cancel the caller's bookings

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;

use crate::db::Storage;
use crate::errors::AppError;
use crate::handlers::guards::AuthenticatedUser;
use crate::models::BookingRequest;
use crate::services::booking_service;

/// GET /api/bookings
pub async fn list_bookings(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let bookings = booking_service::list_for_user(storage.get_ref(), &auth.user).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// POST /api/bookings
/// The total is computed server-side from the item's current price
pub async fn create_booking(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    body: web::Json<BookingRequest>,
) -> Result<impl Responder, AppError> {
    let today = Utc::now().date_naive();
    let booking =
        booking_service::create_booking(storage.get_ref(), &auth.user, body.into_inner(), today)
            .await?;

    log::info!(
        "User {} booked {} {} (booking {}, total {:.2})",
        auth.user.id,
        booking.item_kind,
        booking.item_id,
        booking.id,
        booking.total_price
    );
    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let booking =
        booking_service::get_visible(storage.get_ref(), &auth.user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let booking =
        booking_service::cancel(storage.get_ref(), &auth.user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/bookings")
            .route("", web::get().to(list_bookings))
            .route("", web::post().to(create_booking))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/cancel", web::post().to(cancel_booking)),
    );
}

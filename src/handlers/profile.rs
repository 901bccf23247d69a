// src/handlers/profile.rs
// DOCUMENTATION: HTTP handlers for the signed-in user's own account
// PURPOSE: Read and update the profile, change the password

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use validator::Validate;

use crate::db::{BookingStore, FavoriteStore, Storage, UserStore};
use crate::errors::AppError;
use crate::handlers::guards::AuthenticatedUser;
use crate::models::{PasswordChange, ProfileUpdate, UserResponse};
use crate::services::{auth_service, registration, SessionStore};

/// Profile view with activity counters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub bookings_count: usize,
    pub favorites_count: usize,
}

/// GET /api/profile
pub async fn get_profile(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let bookings = storage.list_bookings(Some(auth.user.id)).await?;
    let favorites = storage.list_favorites(auth.user.id, None).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: auth.user.to_response(),
        bookings_count: bookings.len(),
        favorites_count: favorites.len(),
    }))
}

/// PUT /api/profile
/// Absent fields are left unchanged; preferences follow the sign-up questionnaire values
pub async fn update_profile(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    body: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    let update = body.into_inner();
    update.validate()?;
    if let Some(preferences) = &update.preferences {
        registration::check_preferences(preferences)?;
    }

    let user = storage.update_profile(auth.user.id, update).await?;
    log::info!("User {} updated profile", user.id);
    Ok(HttpResponse::Ok().json(user.to_response()))
}

/// PUT /api/profile/password
/// Other sessions of the user are signed out; the current one stays valid
pub async fn change_password(
    storage: web::Data<dyn Storage>,
    sessions: web::Data<SessionStore>,
    auth: AuthenticatedUser,
    body: web::Json<PasswordChange>,
) -> Result<impl Responder, AppError> {
    auth_service::change_password(storage.get_ref(), &auth.user, body.into_inner()).await?;

    sessions
        .destroy_user_sessions(auth.user.id, Some(&auth.session_id))
        .await;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/profile")
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_profile))
            .route("/password", web::put().to(change_password)),
    );
}

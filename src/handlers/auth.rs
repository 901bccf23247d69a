// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for sign-up, sign-in and sessions
// PURPOSE: Parse requests, call auth services, set and clear the session cookie

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::db::Storage;
use crate::errors::AppError;
use crate::handlers::guards::AuthenticatedUser;
use crate::models::LoginRequest;
use crate::services::registration::{self, SignupForm, SignupStep};
use crate::services::{auth_service, LoginThrottle, SessionStore, SESSION_COOKIE};

/// POST /api/auth/register/steps/{step}
/// Validate one wizard step without creating anything
pub async fn validate_step(
    storage: web::Data<dyn Storage>,
    path: web::Path<u8>,
    form: web::Json<SignupForm>,
) -> Result<impl Responder, AppError> {
    let step = SignupStep::from_number(path.into_inner())?;
    let result = registration::check_step(storage.get_ref(), step, &form).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/auth/register
/// Create the account and sign it in
pub async fn register(
    storage: web::Data<dyn Storage>,
    sessions: web::Data<SessionStore>,
    form: web::Json<SignupForm>,
) -> Result<impl Responder, AppError> {
    let user = auth_service::register(storage.get_ref(), form.into_inner()).await?;
    let sid = sessions.create(user.id).await;

    Ok(HttpResponse::Created()
        .cookie(sessions.cookie(sid))
        .json(user.to_response()))
}

/// POST /api/auth/login
pub async fn login(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
    sessions: web::Data<SessionStore>,
    throttle: web::Data<LoginThrottle>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let client = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();
    throttle.check(&client)?;

    let user = auth_service::login(storage.get_ref(), &body.email, &body.password).await?;
    let sid = sessions.create(user.id).await;

    Ok(HttpResponse::Ok()
        .cookie(sessions.cookie(sid))
        .json(user.to_response()))
}

/// POST /api/auth/logout
/// Always succeeds; the cookie is expired even without a live session
pub async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if sessions.destroy(cookie.value()).await {
            log::debug!("Session ended by logout");
        }
    }
    HttpResponse::NoContent()
        .cookie(sessions.removal_cookie())
        .finish()
}

/// GET /api/auth/me
pub async fn me(auth: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(auth.user.to_response())
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register/steps/{step}", web::post().to(validate_step))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

// src/handlers/guards.rs
// DOCUMENTATION: Request guards for protected routes
// PURPOSE: Resolve the session cookie to a user (requireAuth) and check the admin role (requireAdmin)

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::db::{Storage, UserStore};
use crate::errors::AppError;
use crate::models::User;
use crate::services::{SessionStore, SESSION_COOKIE};

/// A signed-in user and the session that authenticated the request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session_id: String,
}

/// A signed-in user whose role is admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

async fn authenticate(req: HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let session_id = req
        .cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let sessions = req.app_data::<web::Data<SessionStore>>().ok_or_else(|| {
        log::error!("SessionStore missing from app data");
        AppError::InternalError
    })?;
    let storage = req.app_data::<web::Data<dyn Storage>>().ok_or_else(|| {
        log::error!("Storage missing from app data");
        AppError::InternalError
    })?;

    let user_id = sessions
        .touch(&session_id)
        .await
        .ok_or(AppError::Unauthorized)?;

    match storage.get_user(user_id).await {
        Ok(user) => Ok(AuthenticatedUser { user, session_id }),
        Err(AppError::NotFound(_)) => {
            sessions.destroy(&session_id).await;
            Err(AppError::Unauthorized)
        }
        Err(e) => Err(e),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let auth = authenticate(req).await?;
            if !auth.user.is_admin() {
                log::warn!("User {} denied admin access", auth.user.id);
                return Err(AppError::Forbidden);
            }
            Ok(AdminUser(auth.user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{self, TestContext};
    use crate::models::Role;
    use actix_web::http::StatusCode;
    use actix_web::{test, HttpResponse};

    async fn whoami(auth: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(auth.user.email)
    }

    async fn admin_only(_admin: AdminUser) -> HttpResponse {
        HttpResponse::NoContent().finish()
    }

    #[actix_web::test]
    async fn test_guards() {
        let ctx = TestContext::new();
        let app = test::init_service(
            test_support::app(&ctx)
                .route("/whoami", web::get().to(whoami))
                .route("/admin-only", web::get().to(admin_only)),
        )
        .await;

        // No cookie
        let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Unknown session id
        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "stale"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let (_, user_cookie) = ctx.sign_in("guest@example.com", Role::User).await;
        let req = test::TestRequest::get().uri("/whoami").cookie(user_cookie.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "guest@example.com");

        let req = test::TestRequest::get().uri("/admin-only").cookie(user_cookie).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let (_, admin_cookie) = ctx.sign_in("boss@example.com", Role::Admin).await;
        let req = test::TestRequest::get().uri("/admin-only").cookie(admin_cookie).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }
}

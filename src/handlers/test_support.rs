// src/handlers/test_support.rs
// DOCUMENTATION: Shared fixtures for HTTP handler tests
// PURPOSE: In-memory app state, signed-in users and an App with the same app_data as main

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use std::sync::Arc;
use std::time::Duration;

use crate::db::{MemStorage, Storage, UserStore};
use crate::models::{NewUser, Role, TravelPreferences, User};
use crate::services::{auth_service, LoginThrottle, SessionStore};

/// Password given to every user created by the fixtures
pub const TEST_PASSWORD: &str = "password123";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub sessions: web::Data<SessionStore>,
    pub throttle: web::Data<LoginThrottle>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_login_quota(100)
    }

    pub fn with_login_quota(attempts_per_minute: u32) -> Self {
        TestContext {
            storage: Arc::new(MemStorage::new()),
            sessions: web::Data::new(SessionStore::new(Duration::from_secs(3600), false)),
            throttle: web::Data::new(LoginThrottle::new(attempts_per_minute)),
        }
    }

    pub async fn create_user(&self, email: &str, role: Role) -> User {
        let password_hash = auth_service::hash_password(TEST_PASSWORD).expect("hash fixture");
        self.storage
            .create_user(NewUser {
                email: email.to_string(),
                password_hash,
                full_name: "Test User".to_string(),
                phone: None,
                role,
                preferences: TravelPreferences::default(),
            })
            .await
            .expect("create fixture user")
    }

    /// Create a user and a session for it, returning the session cookie
    pub async fn sign_in(&self, email: &str, role: Role) -> (User, Cookie<'static>) {
        let user = self.create_user(email, role).await;
        let sid = self.sessions.create(user.id).await;
        (user, self.sessions.cookie(sid))
    }
}

pub fn app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(ctx.storage.clone()))
        .app_data(ctx.sessions.clone())
        .app_data(ctx.throttle.clone())
        .app_data(super::json_config())
        .app_data(super::query_config())
        .app_data(super::path_config())
}

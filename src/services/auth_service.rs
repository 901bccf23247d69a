// src/services/auth_service.rs
// DOCUMENTATION: Credentials and account lifecycle
// PURPOSE: Argon2 password hashing, registration, sign-in and password changes

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use validator::Validate;

use crate::db::{Storage, UserStore};
use crate::errors::AppError;
use crate::models::{NewUser, PasswordChange, Role, User};
use crate::services::registration::{self, SignupForm};

/// Hash a password into a PHC string ($argon2id$...)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            AppError::InternalError
        })
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        log::error!("Stored password hash is malformed: {}", e);
        AppError::InternalError
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Well-formed argon2id hash that no password matches
/// Verified against for unknown emails so both login failures cost one hash
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Run a CPU-bound argon2 job on the blocking pool
async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job).await.map_err(|e| {
        log::error!("Password hashing task failed: {}", e);
        AppError::InternalError
    })?
}

/// [`hash_password`] off the async executor
pub async fn hash_password_async(password: String) -> Result<String, AppError> {
    run_blocking(move || hash_password(&password)).await
}

/// [`verify_password`] off the async executor
pub async fn verify_password_async(password: String, password_hash: String) -> Result<bool, AppError> {
    run_blocking(move || verify_password(&password, &password_hash)).await
}

/// Validate every wizard step and create a regular user account
pub async fn register(storage: &dyn Storage, form: SignupForm) -> Result<User, AppError> {
    registration::check_all_steps(storage, &form).await?;

    let user = storage
        .create_user(NewUser {
            email: form.normalized_email(),
            password_hash: hash_password_async(form.password.clone()).await?,
            full_name: form.full_name.trim().to_string(),
            phone: form.phone.clone(),
            role: Role::User,
            preferences: form.preferences(),
        })
        .await?;

    log::info!("Registered user {} ({})", user.id, user.email);
    Ok(user)
}

/// Resolve credentials to a user
/// DOCUMENTATION: Unknown email and wrong password are indistinguishable to the caller
pub async fn login(storage: &dyn Storage, email: &str, password: &str) -> Result<User, AppError> {
    let email = email.trim().to_lowercase();
    let user = match storage.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            verify_password_async(password.to_string(), DUMMY_HASH.to_string()).await?;
            log::warn!("Login attempt for unknown email {}", email);
            return Err(AppError::Unauthorized);
        }
    };

    if !verify_password_async(password.to_string(), user.password_hash.clone()).await? {
        log::warn!("Wrong password for user {}", user.id);
        return Err(AppError::Unauthorized);
    }

    log::info!("User {} signed in", user.id);
    Ok(user)
}

/// Replace the password after checking the current one
pub async fn change_password(
    storage: &dyn Storage,
    user: &User,
    change: PasswordChange,
) -> Result<(), AppError> {
    change.validate()?;

    if !verify_password_async(change.current_password, user.password_hash.clone()).await? {
        return Err(AppError::InvalidInput(
            "current password is incorrect".to_string(),
        ));
    }

    storage
        .set_password_hash(user.id, hash_password_async(change.new_password).await?)
        .await?;
    log::info!("User {} changed password", user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemStorage, UserStore};
    use crate::services::registration::complete_form;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_hash_and_verify() {
        let hash = assert_ok!(hash_password("correct horse"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(assert_ok!(verify_password("correct horse", &hash)));
        assert!(!assert_ok!(verify_password("wrong horse", &hash)));
        assert_err!(verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_dummy_hash_parses_and_matches_nothing() {
        assert!(!assert_ok!(verify_password("", DUMMY_HASH)));
        assert!(!assert_ok!(verify_password("admin123", DUMMY_HASH)));
    }

    #[tokio::test]
    async fn test_async_helpers_run_on_blocking_pool() {
        let hash = assert_ok!(hash_password_async("correct horse".to_string()).await);
        assert!(assert_ok!(verify_password_async("correct horse".to_string(), hash.clone()).await));
        assert!(!assert_ok!(verify_password_async("wrong horse".to_string(), hash).await));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let storage = MemStorage::new();
        let user = assert_ok!(register(&storage, complete_form("Marina@Example.COM")).await);
        assert_eq!(user.email, "marina@example.com");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.preferences.interests, vec!["diving", "beaches"]);
        assert_ne!(user.password_hash, "noronha2024");

        let signed_in = assert_ok!(login(&storage, "MARINA@example.com", "noronha2024").await);
        assert_eq!(signed_in.id, user.id);

        let err = assert_err!(login(&storage, "marina@example.com", "wrong-pass").await);
        assert!(matches!(err, AppError::Unauthorized));
        let err = assert_err!(login(&storage, "nobody@example.com", "noronha2024").await);
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_register_twice_fails_on_account_step() {
        let storage = MemStorage::new();
        assert_ok!(register(&storage, complete_form("dup@example.com")).await);
        let err = assert_err!(register(&storage, complete_form("DUP@example.com")).await);
        assert!(matches!(err, AppError::RegistrationStep { step: 1, .. }));
    }

    #[tokio::test]
    async fn test_change_password() {
        let storage = MemStorage::new();
        let user = assert_ok!(register(&storage, complete_form("ana@example.com")).await);

        let wrong = PasswordChange {
            current_password: "not-it-at-all".to_string(),
            new_password: "brand-new-pass".to_string(),
        };
        assert!(matches!(
            change_password(&storage, &user, wrong).await,
            Err(AppError::InvalidInput(_))
        ));

        let too_short = PasswordChange {
            current_password: "noronha2024".to_string(),
            new_password: "short".to_string(),
        };
        assert!(matches!(
            change_password(&storage, &user, too_short).await,
            Err(AppError::ValidationError(_))
        ));

        let ok = PasswordChange {
            current_password: "noronha2024".to_string(),
            new_password: "brand-new-pass".to_string(),
        };
        assert_ok!(change_password(&storage, &user, ok).await);
        assert_ok!(login(&storage, "ana@example.com", "brand-new-pass").await);
        assert_err!(login(&storage, "ana@example.com", "noronha2024").await);

        let reloaded = assert_ok!(storage.get_user(user.id).await);
        assert!(reloaded.password_hash.starts_with("$argon2id$"));
    }
}

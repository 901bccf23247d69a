// src/models/user.rs
// DOCUMENTATION: User accounts, roles and travel preferences
// PURPOSE: Internal user record plus the DTOs exposed over the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::errors::AppError;

/// Authorization role; only admins may mutate the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::InvalidInput(format!("unknown role '{}'", other))),
        }
    }
}

/// Answers collected by the sign-up questionnaire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    pub travel_style: Option<String>,
    pub group_type: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub budget_range: Option<String>,
    pub trip_duration: Option<String>,
}

/// Complete user record as kept by storage
/// DOCUMENTATION: Never serialized directly - use to_response()
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub preferences: TravelPreferences,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Convert User to UserResponse for API
    /// DOCUMENTATION: Excludes the password hash
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
            preferences: self.preferences.clone(),
            created_at: self.created_at,
        }
    }
}

/// Insert payload handed to storage once credentials are hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub preferences: TravelPreferences,
}

/// Request DTO for POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request DTO for PUT /api/profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 2, max = 120))]
    pub full_name: Option<String>,

    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub avatar_url: Option<String>,

    pub preferences: Option<TravelPreferences>,
}

/// Request DTO for PUT /api/profile/password
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Request DTO for PATCH /api/admin/users/{id}/role
#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub preferences: TravelPreferences,
    pub created_at: DateTime<Utc>,
}

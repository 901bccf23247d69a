// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configuration and shared extractor settings

use actix_web::web;

use crate::errors::AppError;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod favorites;
pub mod guards;
pub mod health;
pub mod profile;
pub mod testimonials;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::config as admin_config;
pub use auth::config as auth_config;
pub use bookings::config as bookings_config;
pub use catalog::config as catalog_config;
pub use favorites::config as favorites_config;
pub use health::config as health_config;
pub use profile::config as profile_config;
pub use testimonials::config as testimonials_config;

/// Malformed or mistyped JSON bodies become INVALID_INPUT errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Unparseable query strings become INVALID_INPUT errors
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Path segments that do not parse (e.g. a non-numeric id) become INVALID_INPUT errors
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

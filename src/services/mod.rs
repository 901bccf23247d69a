// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod favorite_service;
pub mod registration;
pub mod session_store;
pub mod testimonial_service;
pub mod throttle;

pub use session_store::{start_cleanup_task, SessionStore, SESSION_COOKIE};
pub use throttle::LoginThrottle;

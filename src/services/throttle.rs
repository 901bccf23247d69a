// src/services/throttle.rs
// DOCUMENTATION: Login attempt throttling
// PURPOSE: Per-client GCRA quota on POST /api/auth/login

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::errors::AppError;

/// Keyed rate limiter; the key is the client address
pub struct LoginThrottle {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginThrottle {
    /// Allow `attempts_per_minute` login attempts per key (minimum 1)
    pub fn new(attempts_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Consume one attempt for `key`
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.limiter.check_key(&key.to_string()).map_err(|_| {
            log::warn!("Login throttled for {}", key);
            AppError::RateLimitExceeded
        })
    }

    /// Drop state for keys whose quota has fully replenished
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }
}

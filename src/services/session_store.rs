// src/services/session_store.rs
// DOCUMENTATION: Server-side session store behind the tuca_sid cookie
// PURPOSE: Map random session ids to user ids with sliding expiry

use actix_web::cookie::{time, Cookie, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tuca_sid";

/// Session entry with expiration
#[derive(Clone, Debug)]
struct SessionEntry {
    user_id: i32,
    expires_at: Instant,
}

impl SessionEntry {
    fn new(user_id: i32, ttl: Duration) -> Self {
        Self {
            user_id,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-memory session store with TTL
/// DOCUMENTATION: Thread-safe; shared by every worker through web::Data
pub struct SessionStore {
    store: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionStore {
    pub fn new(ttl: Duration, secure_cookie: bool) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            secure_cookie,
        }
    }

    /// Start a session for the user and return its id
    pub async fn create(&self, user_id: i32) -> String {
        let sid = Uuid::new_v4().to_string();
        let mut store = self.store.write().await;
        store.insert(sid.clone(), SessionEntry::new(user_id, self.ttl));
        log::debug!("Session created for user {}", user_id);
        sid
    }

    /// Resolve a session id to its user and push its expiry forward
    /// Expired entries are removed on sight
    pub async fn touch(&self, sid: &str) -> Option<i32> {
        let mut store = self.store.write().await;

        match store.get_mut(sid) {
            Some(entry) if !entry.is_expired() => {
                entry.expires_at = Instant::now() + self.ttl;
                return Some(entry.user_id);
            }
            Some(_) => log::debug!("Session EXPIRED"),
            None => {
                log::debug!("Session MISS");
                return None;
            }
        }

        store.remove(sid);
        None
    }

    /// End one session; returns whether it existed
    pub async fn destroy(&self, sid: &str) -> bool {
        let mut store = self.store.write().await;
        store.remove(sid).is_some()
    }

    /// End every session of a user except `keep`
    pub async fn destroy_user_sessions(&self, user_id: i32, keep: Option<&str>) -> usize {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|sid, entry| entry.user_id != user_id || Some(sid.as_str()) == keep);
        let removed = before - store.len();
        if removed > 0 {
            log::info!("Ended {} other session(s) of user {}", removed, user_id);
        }
        removed
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Session cleanup: removed {} expired sessions ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get session statistics
    pub async fn stats(&self) -> SessionStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        SessionStats {
            total_sessions: total,
            expired_sessions: expired,
            active_sessions: total - expired,
        }
    }

    /// Cookie carrying a freshly created session id
    pub fn cookie(&self, sid: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, sid)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .max_age(time::Duration::seconds(self.ttl.as_secs() as i64))
            .finish()
    }

    /// Cookie instructing the browser to drop the session
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Session statistics
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_sessions: usize,
    pub expired_sessions: usize,
    pub active_sessions: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired sessions
/// A zero interval is treated as one second
pub fn start_cleanup_task(sessions: Arc<SessionStore>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            sessions.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_create_and_touch() {
        let sessions = SessionStore::new(Duration::from_secs(60), false);
        let sid = sessions.create(7).await;

        assert_eq!(sessions.touch(&sid).await, Some(7));
        assert_eq!(sessions.touch("not-a-session").await, None);
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let sessions = SessionStore::new(Duration::from_millis(50), false);
        let sid = sessions.create(1).await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(sessions.touch(&sid).await, None);
        // Expired entry was dropped on lookup
        assert_eq!(sessions.stats().await.total_sessions, 0);
    }

    #[tokio::test]
    async fn test_touch_slides_expiry() {
        let sessions = SessionStore::new(Duration::from_millis(150), false);
        let sid = sessions.create(1).await;

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert_eq!(sessions.touch(&sid).await, Some(1));
        }
    }

    #[tokio::test]
    async fn test_destroy_user_sessions_keeps_current() {
        let sessions = SessionStore::new(Duration::from_secs(60), false);
        let current = sessions.create(1).await;
        let other = sessions.create(1).await;
        let someone_else = sessions.create(2).await;

        let removed = sessions.destroy_user_sessions(1, Some(&current)).await;
        assert_eq!(removed, 1);
        assert_eq!(sessions.touch(&current).await, Some(1));
        assert_eq!(sessions.touch(&other).await, None);
        assert_eq!(sessions.touch(&someone_else).await, Some(2));

        assert!(sessions.destroy(&current).await);
        assert!(!sessions.destroy(&current).await);
    }

    #[tokio::test]
    async fn test_session_cleanup() {
        let sessions = SessionStore::new(Duration::from_millis(50), false);
        sessions.create(1).await;
        sessions.create(2).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(sessions.stats().await.expired_sessions, 2);

        sessions.cleanup().await;
        let stats = sessions.stats().await;
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.active_sessions, 0);
    }

    #[test]
    fn test_cookie_attributes() {
        let sessions = SessionStore::new(Duration::from_secs(3600), true);
        let cookie = sessions.cookie("abc".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));

        let removal = sessions.removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }
}

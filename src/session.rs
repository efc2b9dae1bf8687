// ABOUTME: Session management with HttpOnly cookies after the identity provider vouches for a user
// ABOUTME: Sessions live in memory, slide on refresh, and are swept once idle past the max age

use crate::error::{AppError, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: String,
    pub email: String,
    pub created_at: i64,
    pub refreshed_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create_session(&self, user_id: String, email: String) -> String {
        let session_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let session_data = SessionData {
            user_id,
            email,
            created_at: now,
            refreshed_at: now,
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }

        session_id
    }

    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        if let Ok(sessions) = self.sessions.read() {
            sessions.get(session_id).cloned()
        } else {
            None
        }
    }

    /// The session, unless it has been idle longer than `max_age_seconds`.
    /// An idle session is dropped on the spot instead of waiting for the sweeper.
    pub fn get_live_session(&self, session_id: &str, max_age_seconds: i64) -> Option<SessionData> {
        let session = self.get_session(session_id)?;
        if is_idle(&session, max_age_seconds) {
            self.remove_session(session_id);
            return None;
        }
        Some(session)
    }

    /// Slide the expiry of a live session forward.
    pub fn refresh_session(&self, session_id: &str, max_age_seconds: i64) -> Option<SessionData> {
        let mut sessions = self.sessions.write().ok()?;
        if is_idle(sessions.get(session_id)?, max_age_seconds) {
            sessions.remove(session_id);
            return None;
        }
        let session = sessions.get_mut(session_id)?;
        session.refreshed_at = chrono::Utc::now().timestamp();
        Some(session.clone())
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    /// Drops idle sessions and returns how many were removed.
    pub fn cleanup_expired_sessions(&self, max_age_seconds: i64) -> usize {
        let cutoff = chrono::Utc::now().timestamp() - max_age_seconds;

        if let Ok(mut sessions) = self.sessions.write() {
            let before = sessions.len();
            sessions.retain(|_, session| session.refreshed_at > cutoff);
            before - sessions.len()
        } else {
            0
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn backdate(&self, session_id: &str, seconds: i64) {
        if let Ok(mut sessions) = self.sessions.write() {
            if let Some(session) = sessions.get_mut(session_id) {
                session.refreshed_at -= seconds;
            }
        }
    }
}

fn is_idle(session: &SessionData, max_age_seconds: i64) -> bool {
    session.refreshed_at <= chrono::Utc::now().timestamp() - max_age_seconds
}

pub const SESSION_COOKIE_NAME: &str = "paylink_session";

pub fn create_session_cookie(session_id: String, secure: bool, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .path("/")
        .build()
}

pub fn create_logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

pub fn session_id_from_jar(jar: &CookieJar) -> Result<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No session cookie found".to_string()))
}

pub fn extract_session_from_jar(
    jar: &CookieJar,
    session_store: &SessionStore,
    max_age_seconds: i64,
) -> Result<SessionData> {
    let session_id = session_id_from_jar(jar)?;

    let session_data = session_store
        .get_live_session(&session_id, max_age_seconds)
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

    Ok(session_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let id = store.create_session("user-1".to_string(), "a@example.com".to_string());

        let session = store.get_session(&id).unwrap();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.email, "a@example.com");

        store.remove_session(&id);
        assert!(store.get_session(&id).is_none());
    }

    #[test]
    fn test_cleanup_removes_only_idle_sessions() {
        let store = SessionStore::new();
        let stale = store.create_session("stale".to_string(), "s@example.com".to_string());
        let fresh = store.create_session("fresh".to_string(), "f@example.com".to_string());
        store.backdate(&stale, 120);

        assert_eq!(store.cleanup_expired_sessions(60), 1);
        assert!(store.get_session(&stale).is_none());
        assert!(store.get_session(&fresh).is_some());
    }

    #[test]
    fn test_refresh_keeps_session_alive() {
        let store = SessionStore::new();
        let id = store.create_session("user-1".to_string(), "a@example.com".to_string());
        store.backdate(&id, 120);

        assert!(store.refresh_session(&id, 3600).is_some());
        assert_eq!(store.cleanup_expired_sessions(60), 0);
        assert_eq!(store.len(), 1);

        assert!(store.refresh_session("missing", 3600).is_none());
    }

    #[test]
    fn test_extract_requires_cookie() {
        let store = SessionStore::new();
        let jar = CookieJar::new();
        assert!(matches!(
            extract_session_from_jar(&jar, &store, 60),
            Err(AppError::Unauthorized(_))
        ));

        let id = store.create_session("user-1".to_string(), "a@example.com".to_string());
        let jar = jar.add(create_session_cookie(id, false, 60));
        assert_eq!(
            extract_session_from_jar(&jar, &store, 60).unwrap().user_id,
            "user-1"
        );
    }

    #[test]
    fn test_idle_session_rejected_before_sweep() {
        let store = SessionStore::new();
        let id = store.create_session("user-1".to_string(), "a@example.com".to_string());
        store.backdate(&id, 120);

        let jar = CookieJar::new().add(create_session_cookie(id.clone(), false, 60));
        assert!(matches!(
            extract_session_from_jar(&jar, &store, 60),
            Err(AppError::Unauthorized(_))
        ));
        assert!(store.get_session(&id).is_none());
    }

    #[test]
    fn test_idle_session_cannot_be_refreshed() {
        let store = SessionStore::new();
        let id = store.create_session("user-1".to_string(), "a@example.com".to_string());
        store.backdate(&id, 120);

        assert!(store.refresh_session(&id, 60).is_none());
        assert!(store.is_empty());
    }
}

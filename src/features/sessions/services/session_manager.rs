//! Session lifecycle: `Unauthenticated -> Active -> Destroyed`.
//!
//! Tokens are 32 bytes from the OS CSPRNG, hex encoded for the cookie. Only
//! their SHA-256 digest reaches the store, so a leaked `sessions` table does
//! not hand out live cookies.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::features::sessions::models::{ActiveSession, DestroyOutcome, SessionRecord};
use crate::features::sessions::stores::SessionStore;

/// Raw token size in bytes
const TOKEN_BYTES: usize = 32;

/// Hex-encoded token length
const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Fresh tokens tried before giving up on a (practically impossible) collision
const MAX_CREATE_ATTEMPTS: usize = 3;

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Issue a new session for an authenticated user and return its token
    pub async fn create(&self, user_id: Uuid, email: &str, username: &str) -> Result<String> {
        let ttl = chrono::Duration::from_std(self.config.ttl)
            .map_err(|e| AppError::Internal(format!("Invalid session TTL: {}", e)))?;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let token = generate_token();
            let now = Utc::now();
            let record = SessionRecord {
                id_hash: digest(&token),
                user_id,
                user_email: email.to_string(),
                username: username.to_string(),
                created_at: now,
                expires_at: now + ttl,
            };

            if self.store.insert(&record).await? {
                debug!("Session created for user {}", user_id);
                return Ok(token);
            }

            warn!(
                "Session token collision on attempt {}/{}, regenerating",
                attempt, MAX_CREATE_ATTEMPTS
            );
        }

        Err(AppError::Internal(
            "Could not allocate a unique session identifier".to_string(),
        ))
    }

    /// Look up an active session. Never fails: anything other than a live,
    /// unexpired session resolves to `None`.
    pub async fn resolve(&self, session_id: &str) -> Option<ActiveSession> {
        if !is_well_formed(session_id) {
            return None;
        }

        let id_hash = digest(session_id);
        let record = match self.store.find(&id_hash).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                error!("Session lookup failed: {}", e);
                return None;
            }
        };

        if record.is_expired_at(Utc::now()) {
            if let Err(e) = self.store.delete(&id_hash).await {
                warn!("Failed to delete expired session: {}", e);
            }
            return None;
        }

        Some(record.into())
    }

    /// End a session. Destroying an unknown or already destroyed session is
    /// not an error.
    pub async fn destroy(&self, session_id: &str) -> Result<DestroyOutcome> {
        if !is_well_formed(session_id) {
            return Ok(DestroyOutcome::AlreadyGone);
        }

        if self.store.delete(&digest(session_id)).await? {
            Ok(DestroyOutcome::Destroyed)
        } else {
            Ok(DestroyOutcome::AlreadyGone)
        }
    }

    /// Drop every expired session from the store
    pub async fn purge_expired(&self) -> Result<u64> {
        self.store.purge_expired(Utc::now()).await
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Cookie carrying a freshly issued token
    pub fn session_cookie(&self, session_id: String) -> Cookie<'static> {
        let max_age = time::Duration::seconds(self.config.ttl.as_secs() as i64);

        Cookie::build((self.config.cookie_name.clone(), session_id))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure_cookie)
            .path("/")
            .max_age(max_age)
            .build()
    }

    /// Cookie that clears the session cookie on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .path("/")
            .build()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SessionBackend;
    use crate::features::sessions::stores::MemorySessionStore;
    use crate::shared::test_helpers::{test_session_config, CollidingSessionStore};
    use std::time::Duration;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemorySessionStore::new()), test_session_config())
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let sessions = manager();
        let user_id = Uuid::now_v7();

        let token = sessions.create(user_id, "alice@x.com", "alice").await.unwrap();
        assert_eq!(token.len(), TOKEN_LEN);

        let active = sessions.resolve(&token).await.expect("session should resolve");
        assert_eq!(active.user_id, user_id);
        assert_eq!(active.user_email, "alice@x.com");
        assert_eq!(active.username, "alice");
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let sessions = manager();
        let user_id = Uuid::now_v7();

        let first = sessions.create(user_id, "a@x.com", "a").await.unwrap();
        let second = sessions.create(user_id, "a@x.com", "a").await.unwrap();
        assert_ne!(first, second);
        assert!(sessions.resolve(&first).await.is_some());
        assert!(sessions.resolve(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let sessions = manager();
        let token = sessions
            .create(Uuid::now_v7(), "a@x.com", "a")
            .await
            .unwrap();

        assert_eq!(
            sessions.destroy(&token).await.unwrap(),
            DestroyOutcome::Destroyed
        );
        assert!(sessions.resolve(&token).await.is_none());
        assert_eq!(
            sessions.destroy(&token).await.unwrap(),
            DestroyOutcome::AlreadyGone
        );
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_tokens() {
        let sessions = manager();
        assert!(sessions.resolve("").await.is_none());
        assert!(sessions.resolve("not-a-token").await.is_none());
        assert!(sessions.resolve(&"z".repeat(TOKEN_LEN)).await.is_none());
        assert!(sessions.resolve(&generate_token()).await.is_none());
        assert_eq!(
            sessions.destroy("garbage").await.unwrap(),
            DestroyOutcome::AlreadyGone
        );
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthenticated() {
        let store = Arc::new(MemorySessionStore::new());
        let config = SessionConfig {
            ttl: Duration::from_millis(1),
            ..test_session_config()
        };
        let sessions = SessionManager::new(store.clone(), config);

        let token = sessions
            .create(Uuid::now_v7(), "a@x.com", "a")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(sessions.resolve(&token).await.is_none());
        // Resolve removed the stale record
        assert!(store.find(&digest(&token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collision_retries_with_new_token() {
        let store = Arc::new(CollidingSessionStore::new(1));
        let sessions = SessionManager::new(store.clone(), test_session_config());

        let token = sessions
            .create(Uuid::now_v7(), "a@x.com", "a")
            .await
            .unwrap();
        assert!(sessions.resolve(&token).await.is_some());
        assert_eq!(store.attempts(), 2);
    }

    #[tokio::test]
    async fn test_persistent_collision_gives_up() {
        let store = Arc::new(CollidingSessionStore::new(usize::MAX));
        let sessions = SessionManager::new(store, test_session_config());

        let result = sessions.create(Uuid::now_v7(), "a@x.com", "a").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let sessions = SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            SessionConfig {
                secure_cookie: true,
                backend: SessionBackend::Memory,
                ..test_session_config()
            },
        );
        let cookie = sessions.session_cookie("abc".to_string());

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_digest_is_stable_and_not_the_token() {
        let token = generate_token();
        assert_eq!(digest(&token), digest(&token));
        assert_ne!(digest(&token), token);
        assert!(is_well_formed(&token));
    }
}

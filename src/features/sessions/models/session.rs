use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted session row.
///
/// `id_hash` is the SHA-256 digest of the token handed to the client; the
/// token itself is never stored.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub id_hash: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Resolved, unexpired session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub user_id: Uuid,
    pub user_email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRecord> for ActiveSession {
    fn from(record: SessionRecord) -> Self {
        Self {
            user_id: record.user_id,
            user_email: record.user_email,
            username: record.username,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

/// Outcome of destroying a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Destroyed,
    AlreadyGone,
}

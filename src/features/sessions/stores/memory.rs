use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SessionStore;
use crate::core::error::Result;
use crate::features::sessions::models::SessionRecord;

/// Process-local session map. Sessions are lost on restart and are not
/// visible to other instances.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&record.id_hash) {
            return Ok(false);
        }
        sessions.insert(record.id_hash.clone(), record.clone());
        Ok(true)
    }

    async fn find(&self, id_hash: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(id_hash).cloned())
    }

    async fn delete(&self, id_hash: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(id_hash).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}

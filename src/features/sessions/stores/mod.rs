//! Session storage backends.
//!
//! Records are keyed by the SHA-256 digest of the client token. Both backends
//! refuse to overwrite an existing key; the manager retries with a new token.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::sessions::models::SessionRecord;

pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new record. Returns `false` when the key is already taken.
    async fn insert(&self, record: &SessionRecord) -> Result<bool>;

    async fn find(&self, id_hash: &str) -> Result<Option<SessionRecord>>;

    /// Returns `true` if a record was removed
    async fn delete(&self, id_hash: &str) -> Result<bool>;

    /// Remove every record expired at `now`; returns the number removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

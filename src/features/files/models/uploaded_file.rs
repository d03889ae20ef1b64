use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the `user_files` table.
///
/// Rows are written once, after the object is in storage, and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct UploadedFile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Name as the client sent it
    pub filename: String,
    /// Object key in the bucket
    pub file_key: String,
    pub file_url: String,
    pub file_size: i64,
    pub file_type: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub upload_date: DateTime<Utc>,
}

/// Insert payload for a stored object
#[derive(Debug, Clone)]
pub struct NewUploadedFile {
    pub user_id: Uuid,
    pub filename: String,
    pub file_key: String,
    pub file_url: String,
    pub file_size: i64,
    pub file_type: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Aggregate storage use for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct FileUsage {
    pub total_files: i64,
    pub total_storage: i64,
}

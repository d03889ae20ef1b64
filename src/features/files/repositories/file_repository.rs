use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::core::database::is_foreign_key_violation;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileUsage, NewUploadedFile, UploadedFile};

/// File metadata store
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Record a stored object. Call only after storage confirmed the write.
    async fn insert(&self, new_file: NewUploadedFile) -> Result<UploadedFile>;

    /// Newest first (`upload_date DESC, id DESC`), at most `limit` rows
    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<UploadedFile>>;

    async fn usage_for_user(&self, user_id: Uuid) -> Result<FileUsage>;
}

/// PostgreSQL implementation over the `user_files` table
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, new_file: NewUploadedFile) -> Result<UploadedFile> {
        let file = sqlx::query_as::<_, UploadedFile>(
            r#"
            INSERT INTO user_files
                (id, user_id, filename, file_key, file_url, file_size, file_type, description, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, filename, file_key, file_url, file_size, file_type,
                      description, is_public, upload_date
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(new_file.user_id)
        .bind(&new_file.filename)
        .bind(&new_file.file_key)
        .bind(&new_file.file_url)
        .bind(new_file.file_size)
        .bind(&new_file.file_type)
        .bind(new_file.description.as_deref())
        .bind(new_file.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                debug!("File insert for unknown user rejected: {:?}", e);
                AppError::ConstraintViolation(format!(
                    "User {} does not exist",
                    new_file.user_id
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(file)
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<UploadedFile>> {
        let files = sqlx::query_as::<_, UploadedFile>(
            r#"
            SELECT id, user_id, filename, file_key, file_url, file_size, file_type,
                   description, is_public, upload_date
            FROM user_files
            WHERE user_id = $1
            ORDER BY upload_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn usage_for_user(&self, user_id: Uuid) -> Result<FileUsage> {
        let usage = sqlx::query_as::<_, FileUsage>(
            r#"
            SELECT COUNT(*)::BIGINT AS total_files,
                   COALESCE(SUM(file_size), 0)::BIGINT AS total_storage
            FROM user_files
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(usage)
    }
}

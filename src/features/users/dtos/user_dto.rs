use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::models::User;
use crate::features::files::models::{FileUsage, UploadedFile};

/// Dashboard profile with storage totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub registered_date: DateTime<Utc>,
    pub total_files: i64,
    /// Sum of file sizes in bytes
    pub total_storage: i64,
}

impl UserInfoDto {
    pub fn new(user: User, usage: FileUsage) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            registered_date: user.created_at,
            total_files: usage.total_files,
            total_storage: usage.total_storage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfoResponseDto {
    pub user: UserInfoDto,
}

/// One entry of the file listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserFileDto {
    pub id: Uuid,
    pub filename: String,
    pub file_url: String,
    pub file_size: i64,
    pub file_type: String,
    pub description: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub is_public: bool,
}

impl From<UploadedFile> for UserFileDto {
    fn from(file: UploadedFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            file_url: file.file_url,
            file_size: file.file_size,
            file_type: file.file_type,
            description: file.description,
            upload_date: file.upload_date,
            is_public: file.is_public,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserFilesResponseDto {
    pub files: Vec<UserFileDto>,
}

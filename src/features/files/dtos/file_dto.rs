use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::UploadedFile;

/// Upload form for OpenAPI documentation.
/// The handler reads the form with axum's `Multipart` extractor.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Free-text description
    #[schema(example = "Holiday photo")]
    pub description: Option<String>,
    /// "true" to store under the public prefix
    #[serde(rename = "isPublic")]
    #[schema(example = "false")]
    pub is_public: Option<String>,
}

/// Stored file as returned right after upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedFileDto {
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    pub url: String,
}

impl From<UploadedFile> for UploadedFileDto {
    fn from(file: UploadedFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            url: file.file_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    pub file: UploadedFileDto,
}

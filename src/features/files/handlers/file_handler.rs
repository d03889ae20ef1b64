use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::ClientInfo;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{UploadFileDto, UploadResponseDto};
use crate::features::files::services::{FileService, FileUpload};
use crate::shared::types::ApiResponse;

/// Upload a file
///
/// Accepts multipart/form-data with:
/// - `file`: the file to upload (required)
/// - `description`: optional free text
/// - `isPublic`: "true" to store under the public prefix
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form with optional description and isPublic fields",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<UploadResponseDto>),
        (status = 400, description = "No file, empty file or file too large"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Storage or database failure")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    client: ClientInfo,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponseDto>>), AppError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut description: Option<String> = None;
    let mut is_public = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                // A part without a filename is a plain form field, not a file
                let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                    debug!("Ignoring 'file' part without a filename");
                    continue;
                };
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = read_limited(field, service.max_file_size()).await?;

                file = Some((data, file_name, content_type));
            }
            "description" => {
                let text = field.text().await.map_err(multipart_error)?;
                let text = text.trim();
                if !text.is_empty() {
                    description = Some(text.to_string());
                }
            }
            "isPublic" => {
                is_public = field.text().await.map_err(multipart_error)?.trim() == "true";
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let (data, original_name, content_type) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let upload = FileUpload {
        data,
        original_name,
        content_type,
        description,
        is_public,
    };
    let file = service.upload(user.user_id, upload, client).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            UploadResponseDto { file: file.into() },
            Some("File uploaded successfully".to_string()),
        )),
    ))
}

/// Buffer a file field, failing as soon as it grows past `limit`
async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation("File too large".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

fn too_large(limit: usize) -> AppError {
    AppError::Validation(format!(
        "File too large. Maximum size is {} bytes ({} MB)",
        limit,
        limit / 1024 / 1024
    ))
}

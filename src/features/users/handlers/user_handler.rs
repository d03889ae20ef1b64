use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UserFilesResponseDto, UserInfoResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Get the current user's profile and storage totals
#[utoipa::path(
    get,
    path = "/api/user/info",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserInfoResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_user_info(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserInfoResponseDto>>> {
    let info = service.user_info(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        UserInfoResponseDto { user: info },
        None,
    )))
}

/// List the current user's most recent uploads (at most 50)
#[utoipa::path(
    get,
    path = "/api/user/files",
    responses(
        (status = 200, description = "Files retrieved successfully", body = ApiResponse<UserFilesResponseDto>),
        (status = 401, description = "Authentication required")
    ),
    tag = "users",
    security(
        ("session_cookie" = [])
    )
)]
pub async fn list_user_files(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserFilesResponseDto>>> {
    let files = service.list_files(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        UserFilesResponseDto { files },
        None,
    )))
}

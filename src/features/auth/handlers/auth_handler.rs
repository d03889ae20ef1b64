use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientInfo};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::services::AuthService;
use crate::shared::types::{ApiResponse, Empty};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error, or username/email already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    client: ClientInfo,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<Empty>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.register(dto, client).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully")),
    ))
}

/// Login with email and password
///
/// On success the session token is returned in an HttpOnly cookie.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    client: ClientInfo,
    jar: CookieJar,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<(CookieJar, Json<ApiResponse<Empty>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session_id = service.login(dto, client).await?;
    let jar = jar.add(service.sessions().session_cookie(session_id));

    Ok((jar, Json(ApiResponse::ok("Login successful"))))
}

/// End the current session
///
/// Succeeds with or without a valid session; the cookie is always cleared.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<Empty>)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    client: ClientInfo,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<Empty>>)> {
    let session_id = jar
        .get(service.sessions().cookie_name())
        .map(|cookie| cookie.value().to_string());

    service.logout(session_id.as_deref(), client).await?;
    let jar = jar.remove(service.sessions().removal_cookie());

    Ok((jar, Json(ApiResponse::ok("Logout successful"))))
}

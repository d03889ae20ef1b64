use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Empty};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        // Files
        files_handlers::upload_file,
        // Users
        users_handlers::get_user_info,
        users_handlers::list_user_files,
    ),
    components(
        schemas(
            // Shared
            Empty,
            ApiResponse<Empty>,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            // Files
            ApiResponse<files_dtos::UploadResponseDto>,
            // Users
            ApiResponse<users_dtos::UserInfoResponseDto>,
            ApiResponse<users_dtos::UserFilesResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and logout"),
        (name = "files", description = "File upload"),
        (name = "users", description = "Dashboard data for the signed-in user"),
    ),
    info(
        title = "SaaS Core API",
        version = "0.1.0",
        description = "API documentation for the SaaS core backend",
    )
)]
pub struct ApiDoc;

/// Registers the session cookie as the API's security scheme
pub struct SecurityAddon {
    pub cookie_name: String,
}

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(&self.cookie_name))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

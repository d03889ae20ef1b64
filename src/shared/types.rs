use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response envelope: `success`, an optional `message`, and the payload
/// fields inlined next to them (e.g. `{"success": true, "file": {...}}`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Payload for responses that carry nothing beside `success`/`message`
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Empty {}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            data,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<Empty> {
        ApiResponse {
            success: false,
            message,
            data: Empty {},
            errors,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::success(Empty {}, Some(message.into()))
    }
}

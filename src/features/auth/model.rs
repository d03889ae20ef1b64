use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::sessions::models::ActiveSession;

/// Identity attached to a request by the session middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
}

impl From<ActiveSession> for AuthenticatedUser {
    fn from(session: ActiveSession) -> Self {
        Self {
            user_id: session.user_id,
            email: session.user_email,
            username: session.username,
        }
    }
}

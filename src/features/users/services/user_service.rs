use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::repositories::UserRepository;
use crate::features::files::repositories::FileRepository;
use crate::features::users::dtos::{UserFileDto, UserInfoDto};
use crate::shared::constants::USER_FILES_LIMIT;

/// Read-only views for the signed-in user's dashboard
pub struct UserService {
    users: Arc<dyn UserRepository>,
    files: Arc<dyn FileRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, files: Arc<dyn FileRepository>) -> Self {
        Self { users, files }
    }

    /// Profile plus storage totals; `NotFound` if the account row is gone
    pub async fn user_info(&self, user_id: Uuid) -> Result<UserInfoDto> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let usage = self.files.usage_for_user(user_id).await?;

        Ok(UserInfoDto::new(user, usage))
    }

    /// Most recent uploads first
    pub async fn list_files(&self, user_id: Uuid) -> Result<Vec<UserFileDto>> {
        let files = self.files.list_by_user(user_id, USER_FILES_LIMIT).await?;

        Ok(files.into_iter().map(UserFileDto::from).collect())
    }
}

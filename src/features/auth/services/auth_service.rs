use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientInfo;
use crate::features::activity::{ActivityEvent, ActivityLogger};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::models::NewUser;
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::services::password_hasher::CredentialHasher;
use crate::features::sessions::models::DestroyOutcome;
use crate::features::sessions::SessionManager;
use crate::shared::constants::{ACTION_USER_LOGIN, ACTION_USER_LOGOUT, ACTION_USER_REGISTERED};

/// Service for account operations (register, login, logout)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    sessions: Arc<SessionManager>,
    activity: ActivityLogger,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: CredentialHasher,
        sessions: Arc<SessionManager>,
        activity: ActivityLogger,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
            activity,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Register a new user. Input must already be validated.
    pub async fn register(&self, dto: RegisterRequestDto, client: ClientInfo) -> Result<Uuid> {
        // Fast path only; the unique constraints decide concurrent races
        if self
            .users
            .find_by_email_or_username(&dto.email, &dto.username)
            .await?
            .is_some()
        {
            return Err(AppError::ConstraintViolation(
                "User or email already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&dto.password).await?;
        let user_id = self
            .users
            .insert(NewUser {
                username: dto.username.clone(),
                email: dto.email.clone(),
                password_hash,
            })
            .await?;

        info!("User registered: id={}, username={}", user_id, dto.username);

        self.activity.record(
            ActivityEvent::new(ACTION_USER_REGISTERED, Some(user_id))
                .with_details(json!({ "username": dto.username, "email": dto.email }))
                .with_client(client.ip_address, client.user_agent),
        );

        Ok(user_id)
    }

    /// Verify credentials and open a session. Returns the session token.
    ///
    /// Unknown email, inactive account and wrong password all produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, dto: LoginRequestDto, client: ClientInfo) -> Result<String> {
        let active = self
            .users
            .find_active_by_email(&dto.email)
            .await?
            .filter(|user| user.is_active);
        let Some(user) = active else {
            self.hasher.verify_decoy(&dto.password).await;
            debug!("Login rejected: no active account for email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(&dto.password, &user.password_hash).await {
            debug!("Login rejected: password mismatch for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let session_id = self
            .sessions
            .create(user.id, &user.email, &user.username)
            .await?;

        info!("User logged in: id={}", user.id);

        self.activity.record(
            ActivityEvent::new(ACTION_USER_LOGIN, Some(user.id))
                .with_details(json!({ "email": user.email }))
                .with_client(client.ip_address, client.user_agent),
        );

        Ok(session_id)
    }

    /// End the caller's session, if any. Safe to call repeatedly.
    pub async fn logout(&self, session_id: Option<&str>, client: ClientInfo) -> Result<()> {
        let Some(session_id) = session_id else {
            return Ok(());
        };

        let active = self.sessions.resolve(session_id).await;

        match self.sessions.destroy(session_id).await? {
            DestroyOutcome::Destroyed => debug!("Session destroyed"),
            DestroyOutcome::AlreadyGone => debug!("Logout for unknown or expired session"),
        }

        if let Some(active) = active {
            info!("User logged out: id={}", active.user_id);
            self.activity.record(
                ActivityEvent::new(ACTION_USER_LOGOUT, Some(active.user_id))
                    .with_client(client.ip_address, client.user_agent),
            );
        }

        Ok(())
    }
}

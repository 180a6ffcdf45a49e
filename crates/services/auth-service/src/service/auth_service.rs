//! Authentication service - registration, login and token rotation.
//!
//! Passwords are hashed with the domain `Password` value object. The current
//! refresh token is stored on the user row; refreshing or logging in replaces
//! it, logging out clears it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use common::messaging::{publish, MessagePublisher};
use common::{AppError, AppResult, TokenKeys};
use domain::{
    parse_roles, NotificationMessage, Password, User, UserResponse, UserRole, USER_REGISTERED_STREAM,
};

use crate::repository::{NewUser, UserRepository};

const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Registration input after request validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub roles: Option<Vec<String>>,
}

/// User plus a fresh token pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a new pair.
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession>;

    async fn logout(&self, user_id: Uuid) -> AppResult<()>;

    async fn me(&self, user_id: Uuid) -> AppResult<User>;

    /// Seed an administrator (CLI only).
    async fn create_admin(&self, email: &str, password: &str, name: &str) -> AppResult<User>;
}

/// Concrete [`AuthService`].
pub struct Authenticator {
    repo: Arc<dyn UserRepository>,
    publisher: Option<Arc<dyn MessagePublisher>>,
    access_keys: Arc<TokenKeys>,
    refresh_keys: TokenKeys,
}

impl Authenticator {
    /// `publisher` is `None` when Redis was unreachable at startup.
    pub fn new(
        repo: Arc<dyn UserRepository>,
        publisher: Option<Arc<dyn MessagePublisher>>,
        access_keys: Arc<TokenKeys>,
        refresh_keys: TokenKeys,
    ) -> Self {
        Self {
            repo,
            publisher,
            access_keys,
            refresh_keys,
        }
    }

    /// Issue a token pair and make the refresh token the only valid one.
    async fn start_session(&self, user: User) -> AppResult<AuthSession> {
        let access_token = self.access_keys.issue(&user)?;
        let refresh_token = self.refresh_keys.issue(&user)?;

        self.repo
            .set_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        Ok(AuthSession {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
        })
    }

    async fn insert_user(&self, email: &str, password: &str, name: &str, roles: Vec<UserRole>) -> AppResult<User> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = Password::new(password)?.into_string();

        self.repo
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                roles,
            })
            .await
    }

    /// Failures are logged; registration never fails because of them.
    async fn announce_registration(&self, user: &User) {
        let Some(publisher) = &self.publisher else {
            tracing::debug!(user_id = %user.id, "Publishing disabled, skipping welcome message");
            return;
        };

        let message = NotificationMessage::user_registered(&user.name, &user.email);
        if let Err(e) = publish(publisher.as_ref(), USER_REGISTERED_STREAM, &message).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to publish USER_REGISTERED");
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let roles = match registration.roles.as_deref() {
            None | Some([]) => vec![UserRole::Attendee],
            Some(names) => parse_roles(names)?,
        };

        if roles.contains(&UserRole::Admin) {
            return Err(AppError::forbidden("Cannot self-register as ADMIN"));
        }

        let user = self
            .insert_user(&registration.email, &registration.password, &registration.name, roles)
            .await?;
        tracing::info!(user_id = %user.id, "User registered");

        let session = self.start_session(user.clone()).await?;
        self.announce_registration(&user).await;

        Ok(session)
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let user = self.repo.find_by_email(email).await?;

        // Verify even for unknown emails so both paths take the same time.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(password);

        match user {
            Some(user) if password_valid => self.start_session(user).await,
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let claims = self
            .refresh_keys
            .verify(refresh_token)
            .map_err(|_| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        let user = self
            .repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!(user_id = %user.id, "Refresh token does not match the stored one");
            return Err(AppError::unauthorized(INVALID_REFRESH_TOKEN));
        }

        self.start_session(user).await
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        self.repo.set_refresh_token(user_id, None).await
    }

    async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn create_admin(&self, email: &str, password: &str, name: &str) -> AppResult<User> {
        let user = self
            .insert_user(email, password, name, vec![UserRole::Admin])
            .await?;
        tracing::info!(user_id = %user.id, "Administrator created");
        Ok(user)
    }
}

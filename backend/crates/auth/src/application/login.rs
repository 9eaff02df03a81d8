//! Login Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::sign_session_token;
use crate::domain::entity::session::AuthSession;
use crate::domain::repository::{CredentialsRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub use platform::client::ClientFingerprint;

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Login output
pub struct LoginOutput {
    /// Session token for cookie
    pub session_token: String,
    pub public_id: String,
    pub role: String,
}

/// Login use case
pub struct LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialsRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    credentials_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> LoginUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialsRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credentials_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credentials_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: LoginInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let mut credentials = self
            .credentials_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credentials not found".to_string()))?;

        if credentials.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !credentials.password_hash.verify(&raw_password) {
            credentials.record_failure();
            self.credentials_repo.update(&credentials).await?;
            return Err(AuthError::InvalidCredentials);
        }

        credentials.reset_failures();
        self.credentials_repo.update(&credentials).await?;

        user.record_login();
        self.user_repo.update(&user).await?;

        let ttl = if input.remember_me {
            self.config.session_ttl_long
        } else {
            self.config.session_ttl_short
        };
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = AuthSession::new(
            user.user_id,
            user.public_id,
            user.role,
            input.remember_me,
            fingerprint.hash_vec(),
            fingerprint.ip_string(),
            ttl,
        );

        self.session_repo.create(&session).await?;

        let session_token = sign_session_token(&self.config.session_secret, session.session_id);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            remember_me = input.remember_me,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token,
            public_id: user.public_id.to_string(),
            role: user.role.code().to_string(),
        })
    }
}

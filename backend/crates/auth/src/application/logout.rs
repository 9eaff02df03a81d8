//! Logout Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Log out from current session
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = parse_session_token(&self.config.session_secret, session_token)?;
        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User logged out");
        Ok(())
    }

    /// Log out from all sessions (except current)
    pub async fn execute_all(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AuthResult<u64> {
        let session_id = parse_session_token(&self.config.session_secret, session_token)?;

        let session = self
            .session_repo
            .find_by_id(session_id, fingerprint_hash)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let deleted = self
            .session_repo
            .delete_all_for_user(&session.user_id, Some(session_id))
            .await?;

        tracing::info!(
            user_id = %session.user_id,
            deleted = deleted,
            "User logged out from all other sessions"
        );

        Ok(deleted)
    }
}

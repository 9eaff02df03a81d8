//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{credentials::Credentials, session::AuthSession, user::User};
use crate::domain::value_object::{email::Email, public_id::PublicId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user and its credentials atomically. A user row
    /// without credentials is unloginable, so the two never persist
    /// separately.
    async fn create_with_credentials(
        &self,
        user: &User,
        credentials: &Credentials,
    ) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by public ID
    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Credentials repository trait
#[trait_variant::make(CredentialsRepository: Send)]
pub trait LocalCredentialsRepository {
    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>>;

    /// Update credentials
    async fn update(&self, credentials: &Credentials) -> AuthResult<()>;
}

/// Auth session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find session by ID and verify fingerprint
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Update session (e.g., last activity)
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete all sessions for a user (except current)
    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

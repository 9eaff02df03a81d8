//! Auth Session Entity
//!
//! An authenticated session, stored server-side and referenced by an
//! HMAC-signed cookie token.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};

/// Auth session entity
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to User
    pub user_id: UserId,
    /// Public ID for API responses
    pub public_id: PublicId,
    /// User role at session creation
    pub role: UserRole,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Whether "Remember Me" was checked
    pub remember_me: bool,
    /// Client fingerprint hash (User-Agent based)
    pub client_fingerprint_hash: Vec<u8>,
    /// Client IP (optional, for logging)
    pub client_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new auth session
    ///
    /// TTL is provided by the application layer (config), not
    /// hard-coded here.
    pub fn new(
        user_id: UserId,
        public_id: PublicId,
        role: UserRole,
        remember_me: bool,
        fingerprint_hash: Vec<u8>,
        client_ip: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            public_id,
            role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            remember_me,
            client_fingerprint_hash: fingerprint_hash,
            client_ip,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Extend session if "Remember Me" is enabled
    ///
    /// Only extends when less than half of `ttl_long` remains.
    pub fn extend_if_needed(&mut self, ttl_long: Duration) {
        if !self.remember_me {
            return;
        }

        let now = Utc::now();
        let new_expires = (now + ttl_long).timestamp_millis();

        if self.expires_at_ms < (now + (ttl_long / 2)).timestamp_millis() {
            self.expires_at_ms = new_expires;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(remember_me: bool, ttl: Duration) -> AuthSession {
        AuthSession::new(
            UserId::new(),
            PublicId::new(),
            UserRole::Student,
            remember_me,
            vec![0u8; 32],
            None,
            ttl,
        )
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let session = sample_session(false, Duration::hours(12));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session() {
        let session = sample_session(false, Duration::seconds(-1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_extend_only_remember_me() {
        let ttl_long = Duration::days(7);

        let mut plain = sample_session(false, Duration::hours(1));
        let before = plain.expires_at_ms;
        plain.extend_if_needed(ttl_long);
        assert_eq!(plain.expires_at_ms, before);

        let mut remembered = sample_session(true, Duration::hours(1));
        remembered.extend_if_needed(ttl_long);
        assert!(remembered.expires_at_ms > (Utc::now() + Duration::days(6)).timestamp_millis());
    }

    #[test]
    fn test_no_extension_with_plenty_of_time_left() {
        let ttl_long = Duration::days(7);
        let mut session = sample_session(true, ttl_long);
        let before = session.expires_at_ms;
        session.extend_if_needed(ttl_long);
        assert_eq!(session.expires_at_ms, before);
    }
}

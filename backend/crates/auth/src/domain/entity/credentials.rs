//! Credentials Entity
//!
//! Authentication credentials for a user, separated from the User
//! entity to isolate sensitive data.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::user_password::UserPassword;

/// Auth credentials entity
///
/// Password hash plus login failure tracking for temporary lockout.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Reference to User
    pub user_id: UserId,
    /// Hashed password
    pub password_hash: UserPassword,
    /// Consecutive login failure count
    pub login_failed_count: i16,
    /// Last login failure time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Account locked until (temporary lockout after failures)
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credentials {
    /// Maximum login failures before temporary lockout
    pub const MAX_LOGIN_FAILURES: i16 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 15;

    /// Create new credentials
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password_hash,
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if account is currently locked
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            Utc::now() < locked_until
        } else {
            false
        }
    }

    /// Record a failed login attempt
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count += 1;
        self.last_failed_at = Some(now);
        self.updated_at = now;

        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + chrono::Duration::minutes(Self::LOCKOUT_MINUTES));
        }
    }

    /// Reset login failure count on successful login
    pub fn reset_failures(&mut self) {
        self.login_failed_count = 0;
        self.last_failed_at = None;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    pub fn update_password(&mut self, new_password: UserPassword) {
        self.password_hash = new_password;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn sample_credentials() -> Credentials {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hash = UserPassword::from_raw(&raw).unwrap();
        Credentials::new(UserId::new(), hash)
    }

    #[test]
    fn test_lockout_after_max_failures() {
        let mut creds = sample_credentials();
        assert!(!creds.is_locked());

        for _ in 0..Credentials::MAX_LOGIN_FAILURES {
            creds.record_failure();
        }

        assert!(creds.is_locked());
        assert_eq!(creds.login_failed_count, Credentials::MAX_LOGIN_FAILURES);
    }

    #[test]
    fn test_reset_clears_lockout() {
        let mut creds = sample_credentials();
        for _ in 0..Credentials::MAX_LOGIN_FAILURES {
            creds.record_failure();
        }
        assert!(creds.is_locked());

        creds.reset_failures();
        assert!(!creds.is_locked());
        assert_eq!(creds.login_failed_count, 0);
        assert!(creds.last_failed_at.is_none());
    }

    #[test]
    fn test_below_threshold_not_locked() {
        let mut creds = sample_credentials();
        for _ in 0..(Credentials::MAX_LOGIN_FAILURES - 1) {
            creds.record_failure();
        }
        assert!(!creds.is_locked());
    }
}

//! User Entity
//!
//! Core user profile entity. Sensitive auth data lives in the
//! Credentials entity.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, person_name::PersonName, public_id::PublicId, user_role::UserRole,
    user_status::UserStatus,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Display name
    pub name: PersonName,
    /// Email (unique, used for login)
    pub email: Email,
    /// Role (Student, Instructor, Admin)
    pub role: UserRole,
    /// Status (Active, Disabled)
    pub status: UserStatus,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given role
    pub fn new(name: PersonName, email: Email, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            name,
            email,
            role,
            status: UserStatus::default(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if user can log in
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: PersonName) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            PersonName::new("Ada Lovelace").unwrap(),
            Email::new("ada@example.com").unwrap(),
            UserRole::Student,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.last_login_at.is_none());
        assert!(user.can_login());
    }

    #[test]
    fn test_disabled_user_cannot_login() {
        let mut user = sample_user();
        user.set_status(UserStatus::Disabled);
        assert!(!user.can_login());
    }

    #[test]
    fn test_record_login() {
        let mut user = sample_user();
        user.record_login();
        assert!(user.last_login_at.is_some());
    }
}

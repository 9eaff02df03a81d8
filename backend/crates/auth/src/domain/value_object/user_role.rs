use serde::{Deserialize, Serialize};
use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// User role
///
/// Roles form a strict hierarchy: every instructor capability check
/// also passes for admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    Instructor = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Student => "student",
            Instructor => "instructor",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_instructor_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Instructor | Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> AppResult<Self> {
        use UserRole::*;
        match id {
            0 => Ok(Student),
            1 => Ok(Instructor),
            2 => Ok(Admin),
            _ => Err(AppError::internal(format!("Invalid UserRole id: {}", id))),
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> AppResult<Self> {
        use UserRole::*;
        match code {
            "student" => Ok(Student),
            "instructor" => Ok(Instructor),
            "admin" => Ok(Admin),
            _ => Err(AppError::bad_request(format!(
                "Invalid UserRole code: {}",
                code
            ))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0).unwrap(), UserRole::Student);
        assert_eq!(UserRole::from_id(1).unwrap(), UserRole::Instructor);
        assert_eq!(UserRole::from_id(2).unwrap(), UserRole::Admin);
        assert!(UserRole::from_id(9).is_err());
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("student").unwrap(), UserRole::Student);
        assert_eq!(
            UserRole::from_code("instructor").unwrap(),
            UserRole::Instructor
        );
        assert_eq!(UserRole::from_code("admin").unwrap(), UserRole::Admin);
        assert!(UserRole::from_code("moderator").is_err());
    }

    #[test]
    fn test_user_role_hierarchy() {
        assert!(!UserRole::Student.is_instructor_or_higher());
        assert!(UserRole::Instructor.is_instructor_or_higher());
        assert!(UserRole::Admin.is_instructor_or_higher());
        assert!(!UserRole::Student.is_admin());
        assert!(!UserRole::Instructor.is_admin());
        assert!(UserRole::Admin.is_admin());
    }
}

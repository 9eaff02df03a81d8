use serde::{Deserialize, Serialize};
use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserStatus {
    #[default]
    Active = 0,
    /// Disabled by an admin. Cannot log in, existing sessions are
    /// still rejected at the middleware.
    Disabled = 1,
}

impl UserStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Disabled => "disabled",
        }
    }

    #[inline]
    pub const fn can_login(&self) -> bool {
        matches!(self, UserStatus::Active)
    }

    #[inline]
    pub fn from_id(id: i16) -> AppResult<Self> {
        match id {
            0 => Ok(UserStatus::Active),
            1 => Ok(UserStatus::Disabled),
            _ => Err(AppError::internal(format!("Invalid UserStatus id: {}", id))),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_roundtrip() {
        assert_eq!(UserStatus::from_id(0).unwrap(), UserStatus::Active);
        assert_eq!(UserStatus::from_id(1).unwrap(), UserStatus::Disabled);
        assert!(UserStatus::from_id(5).is_err());
    }

    #[test]
    fn test_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::Disabled.can_login());
    }
}

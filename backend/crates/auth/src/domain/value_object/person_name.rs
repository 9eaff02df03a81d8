//! Person Name Value Object
//!
//! Display name shown on dashboards, rosters, and discussion posts.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const NAME_MAX_LENGTH: usize = 100;

/// Validated display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name with validation
    ///
    /// Trims whitespace, rejects empty names, control characters,
    /// and names over 100 code points.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_valid() {
        assert!(PersonName::new("Ada Lovelace").is_ok());
        assert!(PersonName::new("山田 太郎").is_ok());
    }

    #[test]
    fn test_name_trimmed() {
        let name = PersonName::new("  Ada  ").unwrap();
        assert_eq!(name.as_str(), "Ada");
    }

    #[test]
    fn test_name_invalid() {
        assert!(PersonName::new("").is_err());
        assert!(PersonName::new("   ").is_err());
        assert!(PersonName::new("a".repeat(NAME_MAX_LENGTH + 1)).is_err());
        assert!(PersonName::new("Ada\u{0000}").is_err());
    }
}

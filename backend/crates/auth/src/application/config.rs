//! Application Configuration

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL without "Remember Me"
    pub session_ttl_short: Duration,
    /// Session TTL with "Remember Me"
    pub session_ttl_long: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "lms_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl_short: Duration::from_secs(12 * 3600), // 12 hours
            session_ttl_long: Duration::from_secs(7 * 24 * 3600), // 1 week
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Build config from environment
    ///
    /// `SESSION_SECRET` must be at least 32 bytes. Falls back to a
    /// random secret when unset, which invalidates all sessions on
    /// restart.
    pub fn from_env() -> Self {
        let mut secret = [0u8; 32];

        match std::env::var("SESSION_SECRET") {
            Ok(value) if value.len() >= 32 => {
                secret.copy_from_slice(&platform::crypto::sha256(value.as_bytes()));
            }
            _ => {
                tracing::warn!("SESSION_SECRET not set or too short, using a random secret");
                let random = platform::crypto::random_bytes(32);
                secret.copy_from_slice(&random);
            }
        }

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v != "false")
            .unwrap_or(true);

        Self {
            session_secret: secret,
            cookie_secure,
            ..Default::default()
        }
    }

    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let random = platform::crypto::random_bytes(32);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&random);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }
}

//! Commerce Configuration

use platform::crypto::{random_bytes, sha256};

/// Payment webhook settings
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Key for the `X-Webhook-Signature` HMAC
    pub webhook_secret: [u8; 32],
    /// Signature verification can only be disabled for local development
    pub verify_signatures: bool,
}

impl CommerceConfig {
    /// Load from environment variables
    ///
    /// - `WEBHOOK_SECRET`: shared secret with the payment gateway
    ///   (at least 32 characters, hashed to the HMAC key)
    /// - `WEBHOOK_VERIFY`: set to `false` to skip signature checks
    ///   in development (default `true`)
    pub fn from_env() -> Self {
        let webhook_secret = match std::env::var("WEBHOOK_SECRET") {
            Ok(secret) if secret.len() >= 32 => sha256(secret.as_bytes()),
            _ => {
                tracing::warn!(
                    "WEBHOOK_SECRET not set or too short; using a random key \
                     (webhooks will fail verification after restart)"
                );
                let bytes = random_bytes(32);
                let mut key = [0u8; 32];
                key.copy_from_slice(&bytes);
                key
            }
        };

        let verify_signatures = std::env::var("WEBHOOK_VERIFY")
            .map(|v| v != "false")
            .unwrap_or(true);

        if !verify_signatures {
            tracing::warn!("webhook signature verification is DISABLED");
        }

        Self {
            webhook_secret,
            verify_signatures,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            webhook_secret: [7u8; 32],
            verify_signatures: true,
        }
    }
}

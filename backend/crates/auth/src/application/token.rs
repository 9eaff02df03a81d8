//! Session Token Signing
//!
//! Tokens have the form `session_id.signature` where the signature is
//! an HMAC-SHA256 over the session UUID string, base64url-encoded.
//! The HMAC lets us reject forged tokens without a database lookup.

use base64::Engine;
use hmac::{Hmac, Mac};
use platform::cookie::{join_signed, split_signed};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed session token for the cookie
pub fn sign_session_token(secret: &[u8; 32], session_id: Uuid) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    join_signed(
        &session_id,
        &base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature),
    )
}

/// Parse and verify a session token, returning the session ID
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id_str, signature_b64) =
        split_signed(token).ok_or(AuthError::SessionInvalid)?;

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id_str
        .parse()
        .map_err(|_| AuthError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_sign_and_parse_roundtrip() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);
        let parsed = parse_session_token(&SECRET, &token).unwrap();
        assert_eq!(parsed, session_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);

        // Swap the session id out from under the signature
        let other_id = Uuid::new_v4();
        let signature = token.split_once('.').unwrap().1;
        let forged = format!("{}.{}", other_id, signature);

        assert!(parse_session_token(&SECRET, &forged).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);

        let other_secret = [9u8; 32];
        assert!(parse_session_token(&other_secret, &token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(parse_session_token(&SECRET, "no-dot-here").is_err());
        assert!(parse_session_token(&SECRET, "a.b.c").is_err());
        assert!(parse_session_token(&SECRET, "").is_err());
    }
}

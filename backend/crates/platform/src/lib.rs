//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used across the backend:
//! - Cryptographic utilities (SHA-256, HMAC, Base64, hex)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Client identification (fingerprints, forwarded IPs)
//! - Slug and invite-code generation

pub mod client;
pub mod code;
pub mod cookie;
pub mod crypto;
pub mod password;
